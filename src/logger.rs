use chrono::Local;
use env_logger::Builder;
use log::Record;
use std::io::Write;

/// Init the global logger on stderr, RUST_LOG overrides the default filter.
/// The level is coloured only when env_logger detects a terminal.
pub fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            let level_style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{} {}{:<5}{:#} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                level_style,
                record.level(),
                level_style,
                location(record),
                record.args(),
            )
        })
        .init();
}

/// file:line of the log call, the module path when the file is unknown
fn location(record: &Record) -> String {
    match (record.file(), record.line()) {
        (Some(file), Some(line)) => format!("{}:{}", file, line),
        (Some(file), None) => file.to_string(),
        _ => record.module_path().unwrap_or("unknown").to_string(),
    }
}
