use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Warehouse result has no column '{0}'")]
    MissingSourceColumn(String),

    #[error("Required column '{0}' not found in DataFrame")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Failed to encode {rows} rows as CSV")]
    CsvEncode {
        rows: usize,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to encode {rows} rows as Parquet")]
    ParquetEncode {
        rows: usize,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to decode Parquet data")]
    ParquetDecode(#[source] PolarsError),

    #[error("Column layout {found:?} does not match the expected {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Failed to write export file '{0}'")]
    ExportWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to create export directory '{0}'")]
    ExportDirCreation(PathBuf, #[source] std::io::Error),
}
