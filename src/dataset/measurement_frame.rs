//! Contains [`MeasurementFrame`], the in-memory table every view and export works on.

use crate::dataset::error::DatasetError;
use crate::dataset::export::{encode_csv, encode_parquet};
use crate::types::columns::{
    column_names, ACCOUNT_ID, BEST_LOCAL_DATE_TIME, BEST_UTC_DATE_TIME, DATE,
    LOCAL_DATE_TIME_OFFSET, METRIC_COLUMNS, UPLOAD_LOCAL_DATE_TIME,
};
use crate::types::measurement::MeasurementRecord;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Number of rows shown by [`MeasurementFrame::preview`].
pub const PREVIEW_ROWS: usize = 10;

type DateTimeField = fn(&MeasurementRecord) -> Option<NaiveDateTime>;
type DateTimeSetter = fn(&mut MeasurementRecord, Option<NaiveDateTime>);

const DATETIME_FIELDS: [(&str, DateTimeField, DateTimeSetter); 3] = [
    (
        UPLOAD_LOCAL_DATE_TIME,
        |r| r.upload_local_date_time,
        |r, v| r.upload_local_date_time = v,
    ),
    (
        BEST_LOCAL_DATE_TIME,
        |r| r.best_local_date_time,
        |r, v| r.best_local_date_time = v,
    ),
    (
        BEST_UTC_DATE_TIME,
        |r| r.best_utc_date_time,
        |r, v| r.best_utc_date_time = v,
    ),
];

// Helper macro to get a column or return ColumnNotFound
macro_rules! get_column {
    ($df:expr, $name:expr) => {
        $df.column($name)
            .map_err(|e| DatasetError::ColumnNotFound($name.to_string(), e))?
    };
}

/// Builds a `Datetime(ns)` column so sub-millisecond digits survive.
///
/// Values outside the nanosecond range (years 1677 to 2262) become null.
fn datetime_column(
    name: &str,
    values: impl Iterator<Item = Option<NaiveDateTime>>,
) -> Column {
    let nanos: Int64Chunked = values
        .map(|v| v.and_then(|dt| dt.and_utc().timestamp_nanos_opt()))
        .collect();
    nanos
        .with_name(name.into())
        .into_datetime(TimeUnit::Nanoseconds, None)
        .into_series()
        .into()
}

/// Per-column metadata for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub non_null: usize,
    pub nulls: usize,
    /// The first row's value, `None` when the frame is empty or the value is missing.
    pub sample: Option<String>,
}

/// A count production table held as a Polars `DataFrame`.
///
/// The frame always has the 23 columns of [`crate::MEASUREMENT_COLUMNS`] in that
/// order: `AccountId` as `Int64`, the three timestamps as `Datetime(ns)`, `date` as
/// `Date`, the seventeen metrics as `Float64` and `LocalDateTimeOffset` as `String`.
/// Missing values are nulls.
///
/// Both the complete result of a fetch and its clean view are `MeasurementFrame`s.
/// Every method leaves `self` untouched and returns new data.
#[derive(Clone, Debug)]
pub struct MeasurementFrame {
    /// The underlying Polars DataFrame.
    pub frame: DataFrame,
}

impl MeasurementFrame {
    /// Wraps a `DataFrame` that is assumed to have the expected layout.
    ///
    /// Use [`Self::validate_layout`] when the frame comes from outside this crate.
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    /// Builds a frame from records, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::DataFrameProcessing`] if Polars rejects the columns.
    pub fn from_records(records: &[MeasurementRecord]) -> Result<Self, DatasetError> {
        let mut columns: Vec<Column> = Vec::with_capacity(METRIC_COLUMNS.len() + 6);

        let account_ids: Vec<Option<i64>> = records.iter().map(|r| r.account_id).collect();
        columns.push(Series::new(ACCOUNT_ID.into(), account_ids).into());

        for (name, field, _) in DATETIME_FIELDS {
            columns.push(datetime_column(name, records.iter().map(field)));
        }

        let dates: Vec<Option<NaiveDate>> = records.iter().map(|r| r.date).collect();
        columns.push(Series::new(DATE.into(), dates).into());

        for (i, name) in METRIC_COLUMNS.iter().enumerate() {
            let values: Vec<Option<f64>> = records.iter().map(|r| r.metrics()[i]).collect();
            columns.push(Series::new((*name).into(), values).into());
        }

        let offsets: Vec<Option<&str>> = records
            .iter()
            .map(|r| r.local_date_time_offset.as_deref())
            .collect();
        columns.push(Series::new(LOCAL_DATE_TIME_OFFSET.into(), offsets).into());

        Ok(Self::new(DataFrame::new(columns)?))
    }

    /// Reads the frame back into records, in row order.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::ColumnNotFound`] if a column is absent and
    /// [`DatasetError::DataFrameProcessing`] if a column has an unexpected type.
    pub fn collect_records(&self) -> Result<Vec<MeasurementRecord>, DatasetError> {
        let df = &self.frame;
        let mut records = vec![MeasurementRecord::default(); df.height()];

        let account_ids = get_column!(df, ACCOUNT_ID).i64()?;
        for (record, value) in records.iter_mut().zip(account_ids.into_iter()) {
            record.account_id = value;
        }

        for (name, _, set) in DATETIME_FIELDS {
            let values = get_column!(df, name).datetime()?;
            for (record, value) in records.iter_mut().zip(values.as_datetime_iter()) {
                set(record, value);
            }
        }

        let dates = get_column!(df, DATE).date()?;
        for (record, value) in records.iter_mut().zip(dates.as_date_iter()) {
            record.date = value;
        }

        for (i, name) in METRIC_COLUMNS.iter().enumerate() {
            let values = get_column!(df, *name).f64()?;
            for (record, value) in records.iter_mut().zip(values.into_iter()) {
                *record.metrics_mut()[i] = value;
            }
        }

        let offsets = get_column!(df, LOCAL_DATE_TIME_OFFSET).str()?;
        for (record, value) in records.iter_mut().zip(offsets.into_iter()) {
            record.local_date_time_offset = value.map(str::to_string);
        }

        Ok(records)
    }

    /// Checks that the column names and their order are exactly the expected ones.
    pub fn validate_layout(&self) -> Result<(), DatasetError> {
        let expected: Vec<String> = column_names().map(str::to_string).collect();
        let found = self.column_names();
        if found != expected {
            return Err(DatasetError::SchemaMismatch { expected, found });
        }
        Ok(())
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Approximate heap size of the frame in bytes.
    pub fn estimated_size(&self) -> usize {
        self.frame.estimated_size()
    }

    /// Missing cells per column, in column order.
    pub fn null_counts(&self) -> Vec<(String, usize)> {
        self.frame
            .get_columns()
            .iter()
            .map(|c| (c.name().to_string(), c.null_count()))
            .collect()
    }

    /// The rows that have a value in every column (the clean view).
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::DataFrameProcessing`] if filtering fails.
    pub fn complete_rows(&self) -> Result<MeasurementFrame, DatasetError> {
        let mut mask = BooleanChunked::full("complete".into(), true, self.frame.height());
        for column in self.frame.get_columns() {
            mask = &mask & &column.as_materialized_series().is_not_null();
        }
        Ok(Self::new(self.frame.filter(&mask)?))
    }

    /// The first [`PREVIEW_ROWS`] rows.
    pub fn preview(&self) -> MeasurementFrame {
        Self::new(self.frame.head(Some(PREVIEW_ROWS)))
    }

    /// Name, type, null statistics and a sample value for every column.
    pub fn column_info(&self) -> Result<Vec<ColumnInfo>, DatasetError> {
        let height = self.frame.height();
        self.frame
            .get_columns()
            .iter()
            .map(|column| -> Result<ColumnInfo, DatasetError> {
                let nulls = column.null_count();
                let sample = if height == 0 {
                    None
                } else {
                    match column.get(0)? {
                        AnyValue::Null => None,
                        AnyValue::String(s) => Some(s.to_string()),
                        other => Some(other.to_string()),
                    }
                };
                Ok(ColumnInfo {
                    name: column.name().to_string(),
                    dtype: column.dtype().to_string(),
                    non_null: height - nulls,
                    nulls,
                    sample,
                })
            })
            .collect()
    }

    /// Encodes the frame as CSV. See [`encode_csv`].
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, DatasetError> {
        encode_csv(&self.frame)
    }

    /// Encodes the frame as Parquet. See [`encode_parquet`].
    pub fn to_parquet_bytes(&self) -> Result<Vec<u8>, DatasetError> {
        encode_parquet(&self.frame)
    }
}
