use crate::types::request::FetchRequest;
use std::fmt;
use std::fmt::{Display, Formatter};

/// The two serialized forms a dataset can be downloaded in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Row-oriented text with a header line.
    Csv,
    /// Snappy-compressed columnar binary.
    Parquet,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Parquet];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Parquet => "application/octet-stream",
        }
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "CSV"),
            ExportFormat::Parquet => write!(f, "Parquet"),
        }
    }
}

/// Which rows of a fetch are exported.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DatasetVariant {
    /// Every fetched row.
    Complete,
    /// Only rows without any missing value.
    Clean,
}

impl DatasetVariant {
    pub const ALL: [DatasetVariant; 2] = [DatasetVariant::Complete, DatasetVariant::Clean];

    pub fn suffix(self) -> &'static str {
        match self {
            DatasetVariant::Complete => "complete",
            DatasetVariant::Clean => "clean",
        }
    }
}

impl Display for DatasetVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// `count_prod_{account}_{start}_{end}_{variant}.{ext}`
pub fn export_file_name(
    request: &FetchRequest,
    variant: DatasetVariant,
    format: ExportFormat,
) -> String {
    format!(
        "count_prod_{}_{}_{}_{}.{}",
        request.account_id,
        request.range.start(),
        request.range.end(),
        variant.suffix(),
        format.extension()
    )
}
