use super::{finite_min_and_max, DatalogError, Table, DEFAULT_CSV, SAMPLE_COLUMN, VERSION};
use clap::{App, Arg};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// A line chart of some table columns against the sample index.
#[derive(Debug, Clone, Copy)]
pub struct Chart {
    pub title: &'static str,
    pub y_desc: &'static str,
    /// appended to the csv stem to name the output svg
    pub suffix: &'static str,
    /// (column, legend label)
    pub series: &'static [(&'static str, &'static str)],
}

pub const ACCEL_CHART: Chart = Chart {
    title: "Acelerômetro",
    y_desc: "Aceleração (g)",
    suffix: "acelerometro",
    series: &[
        ("accel_x", "Acc X"),
        ("accel_y", "Acc Y"),
        ("accel_z", "Acc Z"),
    ],
};

pub const GYRO_CHART: Chart = Chart {
    title: "Giroscópio",
    y_desc: "Velocidade Angular (°/s)",
    suffix: "giroscopio",
    series: &[
        ("gyro_x", "Gyro X"),
        ("gyro_y", "Gyro Y"),
        ("gyro_z", "Gyro Z"),
    ],
};

pub const TEMP_CHART: Chart = Chart {
    title: "Temperatura",
    y_desc: "Temperatura (°C)",
    suffix: "temperatura",
    series: &[("temp", "Temp")],
};

pub const X_DESC: &str = "Amostra";
const MAX_X_LABELS: usize = 10;

const SERIES_COLORS: [RGBColor; 3] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
];

/// Takes the CLI arguments that control the loading and plotting of the datalog.
/// Returns csvin, latest-datalog directory, output directory, temp, strict, verbose.
pub fn parse_cli() -> (PathBuf, Option<PathBuf>, Option<PathBuf>, bool, bool, bool) {
    let arg_csvin = Arg::with_name("input_csvfile")
        .help("name for the csv file")
        .short("f")
        .long("csvfile")
        .takes_value(true)
        .default_value(DEFAULT_CSV);
    let arg_latest = Arg::with_name("latest_dir")
        .help("plot the datalogN.csv with the largest N in this directory, overrides csvfile")
        .short("l")
        .long("latest")
        .takes_value(true);
    let arg_outdir = Arg::with_name("output_dir")
        .help("directory for the output svg files, defaults to the csv directory")
        .short("o")
        .long("outdir")
        .takes_value(true);
    let arg_temp = Arg::with_name("temp")
        .help("also plot the temperature column")
        .long("temp")
        .takes_value(false);
    let arg_strict = Arg::with_name("strict")
        .help("check that all the expected columns are present right after loading")
        .long("strict")
        .takes_value(false);
    let arg_verbose = Arg::with_name("verbose")
        .help("print verbose information")
        .short("v")
        .long("verbose")
        .takes_value(false);
    let cli_args = App::new("Datalog_plot")
        .version(VERSION.unwrap_or("unknown"))
        .author("Luca Peruzzo")
        .about("cli app to plot the accelerometer and gyroscope datalog")
        .arg(arg_csvin)
        .arg(arg_latest)
        .arg(arg_outdir)
        .arg(arg_temp)
        .arg(arg_strict)
        .arg(arg_verbose)
        .get_matches();
    let csvin = PathBuf::from(cli_args.value_of("input_csvfile").unwrap_or(DEFAULT_CSV));
    let latest = cli_args.value_of("latest_dir").map(PathBuf::from);
    let outdir = cli_args.value_of("output_dir").map(PathBuf::from);
    return (
        csvin,
        latest,
        outdir,
        cli_args.is_present("temp"),
        cli_args.is_present("strict"),
        cli_args.is_present("verbose"),
    );
}

/// <outdir>/<csv stem>_<chart suffix>.svg, outdir defaults to the csv directory
pub fn chart_path(csvin: &Path, outdir: Option<&Path>, chart: &Chart) -> PathBuf {
    let stem = csvin
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("datalog");
    let dir = match outdir {
        Some(d) => d,
        None => csvin.parent().unwrap_or_else(|| Path::new("")),
    };
    dir.join(format!("{}_{}.svg", stem, chart.suffix))
}

/// min..max with a margin of span * fraction on each side,
/// a zero span is widened to 1 so that constant series still get an axis
pub fn padded_range(min: f64, max: f64, fraction: f64) -> (f64, f64) {
    let span = if max > min { max - min } else { 1. };
    let margin = span * fraction;
    (min - margin, max + margin)
}

/// max number of x labels, at most one per integer sample index in min..=max
/// so that the ticks never fall between two samples
pub fn x_label_count(min: f64, max: f64) -> usize {
    let span = (max - min).max(0.).round() as usize;
    (span + 1).min(MAX_X_LABELS)
}

/// splits the (x, y) points wherever either value is not finite
pub fn finite_segments(x: &[f64], y: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut segments: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for (&xv, &yv) in x.iter().zip(y.iter()) {
        if xv.is_finite() && yv.is_finite() {
            current.push((xv, yv));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Plots the chart series against the sample index to svg.
/// The columns are looked up here, so a missing column fails when its chart is drawn.
pub fn plot_chart(table: &Table, chart: &Chart, fout: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if table.is_empty() {
        return Err(DatalogError::EmptyTable.into());
    }
    let x = table.column_f64(SAMPLE_COLUMN)?;
    let mut series: Vec<(&str, Vec<f64>)> = Vec::with_capacity(chart.series.len());
    for (column, label) in chart.series.iter() {
        series.push((*label, table.column_f64(column)?));
    }

    let (xmin, xmax) = finite_min_and_max(&x).unwrap_or((0., 0.));
    let x_labels = x_label_count(xmin, xmax);
    let (xmin, xmax) = padded_range(xmin, xmax, 1. / 20.);
    let all_y: Vec<f64> = series.iter().flat_map(|(_, s)| s.iter().copied()).collect();
    let (ymin, ymax) = finite_min_and_max(&all_y).unwrap_or((0., 0.));
    let (ymin, ymax) = padded_range(ymin, ymax, 1. / 10.);

    let root = SVGBackend::new(fout, (1000, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut cc = ChartBuilder::on(&root)
        .caption(chart.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(xmin..xmax, ymin..ymax)?;
    cc.configure_mesh()
        .light_line_style(&TRANSPARENT)
        .bold_line_style(RGBColor(200, 200, 200).stroke_width(1))
        .set_all_tick_mark_size(2)
        .label_style(("sans-serif", 16))
        .x_labels(x_labels)
        .x_desc(X_DESC)
        .y_desc(chart.y_desc)
        .x_label_formatter(&|x: &f64| format!("{}", x.round()))
        .y_label_formatter(&|y: &f64| format!("{:.2}", y))
        .draw()?;

    for ((label, ys), &color) in series.iter().zip(SERIES_COLORS.iter().cycle()) {
        // one line per run of finite values, the legend entry goes on the first
        for (i, segment) in finite_segments(&x, ys).into_iter().enumerate() {
            let anno = cc.draw_series(LineSeries::new(segment, color.stroke_width(2)))?;
            if i == 0 {
                anno.label(*label).legend(move |(lx, ly)| {
                    PathElement::new(vec![(lx, ly), (lx + 20, ly)], color.stroke_width(2))
                });
            }
        }
    }
    cc.configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 16))
        .draw()?;
    root.present()?;
    log::debug!("plotted '{}' to {}", chart.title, fout.display());
    Ok(())
}
