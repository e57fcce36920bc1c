// tests/datalog_test.rs

use datalog_plot::plot::{chart_path, plot_chart, ACCEL_CHART, GYRO_CHART};
use datalog_plot::{find_latest_datalog, DatalogError, Table, SAMPLE_COLUMN};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const TWO_ROWS: &str = "amostra,accel_x,accel_y,accel_z,gyro_x,gyro_y,gyro_z\n\
    0,0.1,0.2,0.9,1.0,0.0,-1.0\n\
    1,0.1,0.2,0.95,1.1,0.1,-0.9\n";

/// fresh empty directory under the system temp dir, one per test
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("datalog_plot_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn missing_file_is_reported_before_parsing() {
    let dir = scratch_dir("missing");
    let fin = dir.join("datalog.csv");
    match Table::from_csv(&fin) {
        Err(DatalogError::MissingInputFile(p)) => assert_eq!(p, fin),
        other => panic!("expected MissingInputFile, got {:?}", other),
    }
}

#[test]
fn directory_is_not_an_input_file() {
    let dir = scratch_dir("isdir");
    let fin = dir.join("datalog.csv");
    fs::create_dir_all(&fin).unwrap();
    assert!(matches!(
        Table::from_csv(&fin),
        Err(DatalogError::MissingInputFile(_))
    ));
}

#[test]
fn two_row_datalog_is_loaded_in_order() {
    let dir = scratch_dir("tworows");
    let fin = dir.join("datalog.csv");
    fs::write(&fin, TWO_ROWS).unwrap();

    let table = Table::from_csv(&fin).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.column_f64(SAMPLE_COLUMN).unwrap(), vec![0., 1.]);
    for chart in [ACCEL_CHART, GYRO_CHART].iter() {
        for (column, _) in chart.series.iter() {
            assert_eq!(table.column_f64(column).unwrap().len(), 2);
        }
    }
    assert_eq!(table.column_f64("accel_z").unwrap(), vec![0.9, 0.95]);
    assert_eq!(table.column_f64("gyro_z").unwrap(), vec![-1.0, -0.9]);
}

#[test]
fn missing_gyro_column_fails_at_plot_time() {
    let dir = scratch_dir("nogyroz");
    let fin = dir.join("datalog.csv");
    fs::write(
        &fin,
        "amostra,accel_x,accel_y,accel_z,gyro_x,gyro_y\n0,0.1,0.2,0.9,1.0,0.0\n",
    )
    .unwrap();

    // loading does not look at the columns
    let table = Table::from_csv(&fin).unwrap();
    assert_eq!(table.len(), 1);

    let svgout = chart_path(&fin, None, &GYRO_CHART);
    let err = plot_chart(&table, &GYRO_CHART, &svgout).unwrap_err();
    match err.downcast_ref::<DatalogError>() {
        Some(DatalogError::MissingColumn(c)) => assert_eq!(c, "gyro_z"),
        other => panic!("expected MissingColumn, got {:?}", other),
    }
    assert!(!svgout.exists());
}

#[test]
fn empty_table_is_not_plotted() {
    let dir = scratch_dir("empty");
    let fin = dir.join("datalog.csv");
    fs::write(&fin, "amostra,accel_x,accel_y,accel_z\n").unwrap();
    let table = Table::from_csv(&fin).unwrap();
    let err = plot_chart(&table, &ACCEL_CHART, &chart_path(&fin, None, &ACCEL_CHART)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DatalogError>(),
        Some(DatalogError::EmptyTable)
    ));
}

#[test]
fn latest_datalog_has_the_largest_index() {
    let dir = scratch_dir("latest");
    for name in ["datalog3.csv", "datalog12.csv", "datalog.csv", "notes.csv", "datalog40.txt"].iter() {
        fs::write(dir.join(name), TWO_ROWS).unwrap();
    }
    assert_eq!(
        find_latest_datalog(&dir).unwrap(),
        Some(dir.join("datalog12.csv"))
    );

    let empty = scratch_dir("latest_empty");
    assert_eq!(find_latest_datalog(&empty).unwrap(), None);
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_datalog_plot"))
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap()
}

/// contents of the <text> nodes of an svg
fn svg_texts(svg: &str) -> Vec<String> {
    svg.split("<text")
        .skip(1)
        .filter_map(|chunk| {
            let start = chunk.find('>')? + 1;
            let end = chunk.find("</text>")?;
            Some(chunk[start..end].trim().to_string())
        })
        .collect()
}

#[test]
fn binary_exits_with_1_without_datalog() {
    let dir = scratch_dir("exit");
    let output = run_in(&dir, &[]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("datalog.csv"), "stdout was: {}", stdout);
    assert!(!dir.join("datalog_acelerometro.svg").exists());
}

#[test]
fn binary_plots_both_charts_and_exits_0() {
    let dir = scratch_dir("success");
    fs::write(dir.join("datalog.csv"), TWO_ROWS).unwrap();
    let output = run_in(&dir, &[]);
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr was: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(dir.join("datalog_acelerometro.svg").is_file());
    assert!(dir.join("datalog_giroscopio.svg").is_file());
    assert!(!dir.join("datalog_temperatura.svg").exists());

    let svg = fs::read_to_string(dir.join("datalog_acelerometro.svg")).unwrap();
    let texts = svg_texts(&svg);
    for expected in ["Acelerômetro", "Amostra", "Acc X", "Acc Y", "Acc Z"].iter() {
        assert!(texts.iter().any(|t| t == expected), "missing {} in {:?}", expected, texts);
    }
    // y labels always carry decimals, so the integer ones are the sample ticks
    let x_ticks: Vec<&String> = texts
        .iter()
        .filter(|t| !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()))
        .collect();
    assert_eq!(x_ticks, vec!["0", "1"]);
}

#[test]
fn strict_rejects_missing_gyro_column_before_plotting() {
    let dir = scratch_dir("strict");
    fs::write(
        dir.join("datalog.csv"),
        "amostra,accel_x,accel_y,accel_z,gyro_x,gyro_y\n0,0.1,0.2,0.9,1.0,0.0\n",
    )
    .unwrap();
    let output = run_in(&dir, &["--strict"]);
    assert_ne!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stderr).contains("gyro_z"));
    assert!(!dir.join("datalog_acelerometro.svg").exists());
    assert!(!dir.join("datalog_giroscopio.svg").exists());
}

#[test]
fn temp_flag_adds_temperature_chart() {
    let dir = scratch_dir("temp");
    fs::write(
        dir.join("datalog.csv"),
        "amostra,accel_x,accel_y,accel_z,gyro_x,gyro_y,gyro_z,temp\n\
         1,0.01,-0.02,0.98,1.15,-0.31,0.08,27.45\n\
         2,0.02,-0.01,0.99,1.22,-0.29,0.10,27.47\n",
    )
    .unwrap();
    let output = run_in(&dir, &["--temp"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(dir.join("datalog_acelerometro.svg").is_file());
    assert!(dir.join("datalog_giroscopio.svg").is_file());
    assert!(dir.join("datalog_temperatura.svg").is_file());
}

#[test]
fn latest_flag_reads_the_largest_datalog() {
    let dir = scratch_dir("latest_bin");
    let logs = dir.join("sd");
    fs::create_dir_all(&logs).unwrap();
    fs::write(logs.join("datalog3.csv"), TWO_ROWS).unwrap();
    fs::write(logs.join("datalog12.csv"), TWO_ROWS).unwrap();
    let output = run_in(&dir, &["-l", "sd"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("datalog12.csv"), "stdout was: {}", stdout);
    assert!(logs.join("datalog12_acelerometro.svg").is_file());
    assert!(logs.join("datalog12_giroscopio.svg").is_file());
    assert!(!logs.join("datalog3_acelerometro.svg").exists());
}

#[test]
fn latest_flag_without_datalogs_is_a_missing_file() {
    let dir = scratch_dir("latest_none");
    let output = run_in(&dir, &["--latest", "."]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("datalog.csv"));
}
