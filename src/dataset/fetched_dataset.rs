//! Contains [`Dataset`], the immutable outcome of one fetch.

use crate::dataset::download::Download;
use crate::dataset::error::DatasetError;
use crate::dataset::export::{encode_csv, encode_parquet};
use crate::dataset::measurement_frame::MeasurementFrame;
use crate::dataset::normalize::NormalizedRows;
use crate::dataset::summary::DatasetSummary;
use crate::types::export_format::{export_file_name, DatasetVariant, ExportFormat};
use crate::types::request::FetchRequest;
use std::time::Duration;

/// One fetch: its request, the complete table, the clean view and their summary.
///
/// Built once by [`crate::CountProd`] and never modified. Downloads are encoded
/// on demand from the frames held here.
#[derive(Debug, Clone)]
pub struct Dataset {
    request: FetchRequest,
    complete: MeasurementFrame,
    clean: MeasurementFrame,
    summary: DatasetSummary,
    fetch_time: Duration,
}

impl Dataset {
    /// Builds the frames and summary from normalized rows.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::DataFrameProcessing`] if a frame cannot be built.
    pub fn from_normalized(
        request: FetchRequest,
        normalized: &NormalizedRows,
        fetch_time: Duration,
    ) -> Result<Self, DatasetError> {
        let complete = MeasurementFrame::from_records(&normalized.records)?;
        Self::new(request, complete, &normalized.malformed, fetch_time)
    }

    /// Wraps an already built complete frame, deriving the clean view and summary.
    pub fn new(
        request: FetchRequest,
        complete: MeasurementFrame,
        malformed: &[(&'static str, usize)],
        fetch_time: Duration,
    ) -> Result<Self, DatasetError> {
        let clean = complete.complete_rows()?;
        let summary = DatasetSummary::compute(&complete, &clean, malformed);
        Ok(Self {
            request,
            complete,
            clean,
            summary,
            fetch_time,
        })
    }

    pub fn request(&self) -> &FetchRequest {
        &self.request
    }

    /// Every fetched row.
    pub fn complete(&self) -> &MeasurementFrame {
        &self.complete
    }

    /// Rows without any missing value.
    pub fn clean(&self) -> &MeasurementFrame {
        &self.clean
    }

    pub fn variant(&self, variant: DatasetVariant) -> &MeasurementFrame {
        match variant {
            DatasetVariant::Complete => &self.complete,
            DatasetVariant::Clean => &self.clean,
        }
    }

    pub fn summary(&self) -> &DatasetSummary {
        &self.summary
    }

    /// Time spent between connecting and having the normalized rows.
    pub fn fetch_time(&self) -> Duration {
        self.fetch_time
    }

    pub fn is_empty(&self) -> bool {
        self.complete.is_empty()
    }

    pub fn file_name(&self, variant: DatasetVariant, format: ExportFormat) -> String {
        export_file_name(&self.request, variant, format)
    }

    /// Encodes one table in one format.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::CsvEncode`] or [`DatasetError::ParquetEncode`].
    pub fn download(
        &self,
        variant: DatasetVariant,
        format: ExportFormat,
    ) -> Result<Download, DatasetError> {
        let frame = &self.variant(variant).frame;
        let bytes = match format {
            ExportFormat::Csv => encode_csv(frame)?,
            ExportFormat::Parquet => encode_parquet(frame)?,
        };
        Ok(Download {
            variant,
            format,
            file_name: self.file_name(variant, format),
            mime: format.mime_type(),
            bytes,
        })
    }

    /// All four downloads: complete and clean, each as CSV and Parquet.
    ///
    /// The clean downloads are produced even when the clean view has no rows.
    pub fn downloads(&self) -> Result<Vec<Download>, DatasetError> {
        let mut downloads = Vec::with_capacity(4);
        for variant in DatasetVariant::ALL {
            for format in ExportFormat::ALL {
                downloads.push(self.download(variant, format)?);
            }
        }
        Ok(downloads)
    }
}
