//! Summary statistics shown next to a fetched dataset.

use crate::dataset::measurement_frame::MeasurementFrame;
use serde::Serialize;

/// Ratio of Parquet file size to in-memory size used for the size estimate.
pub const PARQUET_SIZE_RATIO: f64 = 0.3;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Missing and malformed cell counts of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMissing {
    pub column: String,
    /// Null cells, including the malformed ones.
    pub missing: usize,
    /// Cells whose source text could not be coerced.
    pub malformed: usize,
}

/// A column with missing values, as listed in the missing-data table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingDetail {
    pub column: String,
    pub missing: usize,
    /// Share of rows missing a value, in percent, rounded to two decimals.
    pub percent: f64,
}

/// Statistics over the complete table of a fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    /// One entry per column, in column order.
    pub missing_by_column: Vec<ColumnMissing>,
    /// Rows with at least one missing value.
    pub rows_with_missing: usize,
    pub estimated_bytes: usize,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percent_of(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

impl DatasetSummary {
    /// Computes the summary of `complete` given its clean view and the malformed
    /// counts reported by normalization.
    pub fn compute(
        complete: &MeasurementFrame,
        clean: &MeasurementFrame,
        malformed: &[(&'static str, usize)],
    ) -> Self {
        let missing_by_column = complete
            .null_counts()
            .into_iter()
            .map(|(column, missing)| {
                let malformed = malformed
                    .iter()
                    .find(|(name, _)| *name == column)
                    .map_or(0, |(_, count)| *count);
                ColumnMissing {
                    column,
                    missing,
                    malformed,
                }
            })
            .collect();

        Self {
            rows: complete.height(),
            columns: complete.width(),
            missing_by_column,
            rows_with_missing: complete.height() - clean.height(),
            estimated_bytes: complete.estimated_size(),
        }
    }

    pub fn total_missing(&self) -> usize {
        self.missing_by_column.iter().map(|c| c.missing).sum()
    }

    pub fn total_malformed(&self) -> usize {
        self.missing_by_column.iter().map(|c| c.malformed).sum()
    }

    /// Missing count of `column`, `None` for an unknown column.
    pub fn missing_count(&self, column: &str) -> Option<usize> {
        self.missing_by_column
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.missing)
    }

    pub fn malformed_count(&self, column: &str) -> Option<usize> {
        self.missing_by_column
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.malformed)
    }

    pub fn is_complete(&self) -> bool {
        self.rows_with_missing == 0
    }

    pub fn rows_with_missing_percent(&self) -> f64 {
        round2(percent_of(self.rows_with_missing, self.rows))
    }

    pub fn estimated_mb(&self) -> f64 {
        self.estimated_bytes as f64 / BYTES_PER_MB
    }

    /// Rough Parquet file size; columnar compression is assumed to reach 30%.
    pub fn estimated_parquet_mb(&self) -> f64 {
        self.estimated_mb() * PARQUET_SIZE_RATIO
    }

    /// Columns with at least one missing value, most missing first.
    pub fn missing_details(&self) -> Vec<MissingDetail> {
        let mut details: Vec<MissingDetail> = self
            .missing_by_column
            .iter()
            .filter(|c| c.missing > 0)
            .map(|c| MissingDetail {
                column: c.column.clone(),
                missing: c.missing,
                percent: round2(percent_of(c.missing, self.rows)),
            })
            .collect();
        details.sort_by(|a, b| b.missing.cmp(&a.missing));
        details
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::normalize::normalize;
    use crate::test_fixtures::{awkward_raw_table, sample_raw_table};
    use crate::types::columns::{CLOCK, SPEED};

    fn summary_of(raw: &crate::RawTable) -> Result<DatasetSummary, Box<dyn std::error::Error>> {
        let normalized = normalize(raw)?;
        let complete = MeasurementFrame::from_records(&normalized.records)?;
        let clean = complete.complete_rows()?;
        Ok(DatasetSummary::compute(&complete, &clean, &normalized.malformed))
    }

    #[test]
    fn test_summary_of_sample_fetch() -> Result<(), Box<dyn std::error::Error>> {
        let summary = summary_of(&sample_raw_table())?;
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.columns, 23);
        assert_eq!(summary.missing_count(SPEED), Some(1));
        assert_eq!(summary.malformed_count(SPEED), Some(1));
        assert_eq!(summary.total_missing(), 1);
        assert_eq!(summary.total_malformed(), 1);
        assert_eq!(summary.rows_with_missing, 1);
        assert_eq!(summary.rows_with_missing_percent(), 33.33);
        assert!(!summary.is_complete());
        assert!(summary.estimated_bytes > 0);
        assert_eq!(summary.missing_count("Humidity"), None);
        Ok(())
    }

    #[test]
    fn test_absent_cells_are_missing_but_not_malformed() -> Result<(), Box<dyn std::error::Error>> {
        let summary = summary_of(&awkward_raw_table())?;
        assert_eq!(summary.missing_count(CLOCK), Some(1));
        assert_eq!(summary.malformed_count(CLOCK), Some(0));
        Ok(())
    }

    #[test]
    fn test_missing_details_sorted_and_rounded() {
        let summary = DatasetSummary {
            rows: 3,
            columns: 3,
            missing_by_column: vec![
                ColumnMissing { column: "A".into(), missing: 1, malformed: 0 },
                ColumnMissing { column: "B".into(), missing: 0, malformed: 0 },
                ColumnMissing { column: "C".into(), missing: 2, malformed: 2 },
            ],
            rows_with_missing: 2,
            estimated_bytes: 3 * 1024 * 1024,
        };
        let details = summary.missing_details();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].column, "C");
        assert_eq!(details[0].percent, 66.67);
        assert_eq!(details[1].column, "A");
        assert_eq!(details[1].percent, 33.33);
        assert_eq!(summary.estimated_mb(), 3.0);
        assert!((summary.estimated_parquet_mb() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary() -> Result<(), Box<dyn std::error::Error>> {
        let empty = MeasurementFrame::from_records(&[])?;
        let summary = DatasetSummary::compute(&empty, &empty, &[]);
        assert_eq!(summary.rows, 0);
        assert_eq!(summary.total_missing(), 0);
        assert_eq!(summary.rows_with_missing_percent(), 0.0);
        assert!(summary.missing_details().is_empty());
        assert!(summary.is_complete());
        Ok(())
    }
}
