use datalog_plot::logger::init_logger;
use datalog_plot::plot::{chart_path, parse_cli, plot_chart, ACCEL_CHART, GYRO_CHART, TEMP_CHART};
use datalog_plot::{find_latest_datalog, DatalogError, Table, DEFAULT_CSV, EXPECTED_COLUMNS};
use std::process;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (csvin, latest, outdir, temp, strict, verbose) = parse_cli();
    init_logger(verbose);

    // a missing directory ends up as a missing datalog.csv
    let csvin = match latest {
        Some(dir) if dir.is_dir() => match find_latest_datalog(&dir)? {
            Some(p) => {
                log::info!("latest datalog in {} is {}", dir.display(), p.display());
                p
            }
            None => dir.join(DEFAULT_CSV),
        },
        Some(dir) => dir.join(DEFAULT_CSV),
        None => csvin,
    };

    let table = match Table::from_csv(&csvin) {
        Ok(t) => t,
        Err(DatalogError::MissingInputFile(p)) => {
            println!("Arquivo '{}' não encontrado!", p.display());
            process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };
    log::info!("{} samples, columns {:?}", table.len(), table.headers());
    if verbose {
        log::debug!("\n{}", table);
    }
    if strict {
        table.require_columns(&EXPECTED_COLUMNS)?;
    }

    let mut charts = vec![ACCEL_CHART, GYRO_CHART];
    if temp {
        charts.push(TEMP_CHART);
    }
    for chart in charts.iter() {
        let svgout = chart_path(&csvin, outdir.as_deref(), chart);
        println!(
            "read data from {} and plot to {}",
            csvin.display(),
            svgout.display()
        );
        plot_chart(&table, chart, &svgout)?;
    }
    Ok(())
}
