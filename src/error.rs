use std::path::PathBuf;

/// Errors raised while loading and reading a datalog table.
#[derive(Debug, thiserror::Error)]
pub enum DatalogError {
    #[error("input file {0:?} not found")]
    MissingInputFile(PathBuf),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("column '{0}' not found")]
    MissingColumn(String),
    #[error("non numeric value '{value}' in column '{column}', row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },
    #[error("the table has no rows")]
    EmptyTable,
}
