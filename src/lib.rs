use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
pub mod error;
pub mod logger;
pub mod plot;

pub use error::DatalogError;

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

pub const DEFAULT_CSV: &str = "datalog.csv";

pub const SAMPLE_COLUMN: &str = "amostra";
pub const ACCEL_COLUMNS: [&str; 3] = ["accel_x", "accel_y", "accel_z"];
pub const GYRO_COLUMNS: [&str; 3] = ["gyro_x", "gyro_y", "gyro_z"];
pub const TEMP_COLUMN: &str = "temp";

/// columns that both charts need, `temp` is optional
pub const EXPECTED_COLUMNS: [&str; 7] = [
    SAMPLE_COLUMN,
    ACCEL_COLUMNS[0],
    ACCEL_COLUMNS[1],
    ACCEL_COLUMNS[2],
    GYRO_COLUMNS[0],
    GYRO_COLUMNS[1],
    GYRO_COLUMNS[2],
];

/// A single csv field, typed on load.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Empty,
}

impl Value {
    pub fn parse(field: &str) -> Value {
        let field = field.trim();
        if field.is_empty() {
            Value::Empty
        } else if let Ok(i) = field.parse::<i64>() {
            Value::Int(i)
        } else if let Ok(f) = field.parse::<f64>() {
            Value::Float(f)
        } else {
            Value::Text(field.to_string())
        }
    }

    /// numeric view of the value, empty fields are missing readings (NAN)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Empty => Some(f64::NAN),
            Value::Text(_) => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            // {:?} keeps the fraction so 1.0 reads back as a float
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Text(s) => write!(f, "{}", s),
            Value::Empty => Ok(()),
        }
    }
}

/// Borrowed view of one table row, fields are looked up by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    headers: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|i| self.values.get(i))
    }
}

/// The sensor log, rows are kept in file order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Init a Table from the csv at the given path.
    /// Fails with MissingInputFile before opening anything if the path is not a regular file.
    /// Columns are not validated here, see `column` and `require_columns`.
    pub fn from_csv(fin: &Path) -> Result<Table, DatalogError> {
        check_input_file(fin)?;
        let file = File::open(fin).map_err(csv::Error::from)?;
        let table = Table::from_reader(BufReader::new(file))?;
        log::debug!(
            "loaded {} rows with columns {:?} from {}",
            table.len(),
            table.headers,
            fin.display()
        );
        Ok(table)
    }

    /// parses comma separated data with the first row as header
    pub fn from_reader<R: Read>(rdr: R) -> Result<Table, DatalogError> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(rdr);
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut rows: Vec<Vec<Value>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(Value::parse).collect());
        }
        Ok(Table { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    pub fn row(&self, i: usize) -> Option<Row<'_>> {
        self.rows.get(i).map(|values| Row {
            headers: &self.headers,
            values,
        })
    }

    fn column_index(&self, column: &str) -> Result<usize, DatalogError> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| DatalogError::MissingColumn(column.to_string()))
    }

    pub fn column(&self, column: &str) -> Result<Vec<&Value>, DatalogError> {
        let i = self.column_index(column)?;
        Ok(self.rows.iter().map(|r| &r[i]).collect())
    }

    /// the column as floats, empty fields become NAN and text is an error
    pub fn column_f64(&self, column: &str) -> Result<Vec<f64>, DatalogError> {
        let i = self.column_index(column)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, r)| {
                r[i].as_f64().ok_or_else(|| DatalogError::NonNumeric {
                    column: column.to_string(),
                    row,
                    value: r[i].to_string(),
                })
            })
            .collect()
    }

    /// writes the header and the rows as csv, quoting fields where needed
    pub fn to_writer<W: Write>(&self, w: W) -> Result<(), DatalogError> {
        let mut wtr = WriterBuilder::new().from_writer(w);
        wtr.write_record(&self.headers)?;
        for r in self.rows.iter() {
            wtr.write_record(r.iter().map(|v| v.to_string()))?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// fails on the first column that is not in the header
    pub fn require_columns(&self, columns: &[&str]) -> Result<(), DatalogError> {
        for c in columns {
            self.column_index(c)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf: Vec<u8> = Vec::new();
        self.to_writer(&mut buf).map_err(|_| std::fmt::Error)?;
        f.write_str(std::str::from_utf8(&buf).map_err(|_| std::fmt::Error)?)
    }
}

/// Ok only if a regular file exists at the path.
pub fn check_input_file(fin: &Path) -> Result<(), DatalogError> {
    if fin.is_file() {
        Ok(())
    } else {
        Err(DatalogError::MissingInputFile(fin.to_path_buf()))
    }
}

/// Returns the datalogN.csv with the largest N in dir, if any.
/// The logger rotates files with this naming, so the largest N is the latest recording.
pub fn find_latest_datalog(dir: &Path) -> std::io::Result<Option<PathBuf>> {
    let mut latest: Option<(u32, PathBuf)> = None;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let n = match path.file_name().and_then(|n| n.to_str()).and_then(datalog_index) {
            Some(n) => n,
            None => continue,
        };
        if !path.is_file() {
            continue;
        }
        if latest.as_ref().map_or(true, |(max, _)| n > *max) {
            latest = Some((n, path));
        }
    }
    Ok(latest.map(|(_, p)| p))
}

/// N of datalogN.csv, digits only and no leading zeros as the logger writes them
fn datalog_index(name: &str) -> Option<u32> {
    let digits = name.strip_prefix("datalog")?.strip_suffix(".csv")?;
    if digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
        || (digits.len() > 1 && digits.starts_with('0'))
    {
        return None;
    }
    digits.parse::<u32>().ok()
}

/// min and max of the finite values, None if there are none
pub fn finite_min_and_max(s: &[f64]) -> Option<(f64, f64)> {
    let mut self_iter = s.iter().filter(|v| v.is_finite());
    let (mut min, mut max) = match self_iter.next() {
        Some(v) => (*v, *v),
        None => return None,
    };
    for es in self_iter {
        if *es > max {
            max = *es
        }
        if *es < min {
            min = *es
        }
    }
    Some((min, max))
}
