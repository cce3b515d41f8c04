use thiserror::Error;

/// Result type alias for table operations
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors that can occur during flatten/unflatten and table I/O operations
#[derive(Error, Debug)]
pub enum TableError {
    /// A data row's cell count does not match the header width
    #[error("Row width mismatch: header has {expected} fields, row has {got} cells")]
    RowWidthMismatch { expected: usize, got: usize },

    /// Two dotted paths collide, or a path tries to descend through a leaf value
    #[error("Path conflict at '{0}'")]
    PathConflict(String),

    /// A write call must receive exactly one of columns or rows
    #[error("Exactly one of columns or rows must be supplied")]
    ColumnsOrRows,

    /// An existing file has no header row to reconcile against
    #[error("File has no header row: {0}")]
    MissingHeader(String),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<csv::Error> for TableError {
    fn from(err: csv::Error) -> Self {
        TableError::CsvError(err.to_string())
    }
}
