//! Turns the warehouse's textual result into typed [`MeasurementRecord`]s.

use crate::dataset::error::DatasetError;
use crate::types::columns::{
    ColumnOrigin, EGGS_COUNTED, LOCAL_DATE_TIME_OFFSET, MEASUREMENT_COLUMNS,
    UPLOAD_LOCAL_DATE_TIME,
};
use crate::types::measurement::MeasurementRecord;
use crate::utils::{
    coerce_date_prefix, coerce_datetime, coerce_float, coerce_integer, coerce_text, Coerced,
};
use crate::warehouse::raw_table::RawTable;
use log::{info, warn};

const COLUMN_COUNT: usize = MEASUREMENT_COLUMNS.len();
const ACCOUNT_ID_POS: usize = 0;
const UPLOAD_POS: usize = 1;
const BEST_LOCAL_POS: usize = 2;
const BEST_UTC_POS: usize = 3;
const DATE_POS: usize = 4;
const FIRST_METRIC_POS: usize = 5;
const OFFSET_POS: usize = 22;

/// Normalized rows plus, per output column, how many cells had text that could
/// not be coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRows {
    pub records: Vec<MeasurementRecord>,
    pub malformed: Vec<(&'static str, usize)>,
}

/// For every output column, the index of the source column feeding it.
struct SourceLayout {
    positions: [usize; COLUMN_COUNT],
}

impl SourceLayout {
    fn resolve(raw: &RawTable) -> Result<Self, DatasetError> {
        let upload = raw.column_index(UPLOAD_LOCAL_DATE_TIME);
        let mut positions = [0usize; COLUMN_COUNT];
        for (slot, def) in positions.iter_mut().zip(MEASUREMENT_COLUMNS.iter()) {
            let found = match def.origin {
                // The prefix can be cut locally when the warehouse did not project it.
                ColumnOrigin::DatePrefix => raw.column_index(def.name).or(upload),
                ColumnOrigin::Document { .. } => raw.column_index(def.name),
            };
            *slot = found.ok_or_else(|| DatasetError::MissingSourceColumn(def.name.to_string()))?;
        }
        Ok(Self { positions })
    }
}

fn tally<T>(counter: &mut usize, coerced: Coerced<T>) -> Option<T> {
    if coerced.is_malformed() {
        *counter += 1;
    }
    coerced.into_option()
}

/// Coerces every cell of `raw` into its column's type, row order preserved.
///
/// Cells that cannot be coerced become `None`; they never fail the call.
///
/// # Errors
///
/// Returns [`DatasetError::MissingSourceColumn`] when the result lacks one of the
/// projected columns.
pub fn normalize(raw: &RawTable) -> Result<NormalizedRows, DatasetError> {
    let layout = SourceLayout::resolve(raw)?;
    let mut counts = [0usize; COLUMN_COUNT];
    let mut records = Vec::with_capacity(raw.len());

    for row in &raw.rows {
        let cell = |pos: usize| row.get(layout.positions[pos]).and_then(|c| c.as_deref());

        let mut record = MeasurementRecord {
            account_id: tally(&mut counts[ACCOUNT_ID_POS], coerce_integer(cell(ACCOUNT_ID_POS))),
            upload_local_date_time: tally(&mut counts[UPLOAD_POS], coerce_datetime(cell(UPLOAD_POS))),
            best_local_date_time: tally(
                &mut counts[BEST_LOCAL_POS],
                coerce_datetime(cell(BEST_LOCAL_POS)),
            ),
            best_utc_date_time: tally(&mut counts[BEST_UTC_POS], coerce_datetime(cell(BEST_UTC_POS))),
            date: tally(&mut counts[DATE_POS], coerce_date_prefix(cell(DATE_POS))),
            local_date_time_offset: tally(&mut counts[OFFSET_POS], coerce_text(cell(OFFSET_POS))),
            ..MeasurementRecord::default()
        };
        for (i, slot) in record.metrics_mut().into_iter().enumerate() {
            let pos = FIRST_METRIC_POS + i;
            *slot = tally(&mut counts[pos], coerce_float(cell(pos)));
        }
        records.push(record);
    }

    let malformed: Vec<(&'static str, usize)> = MEASUREMENT_COLUMNS
        .iter()
        .zip(counts)
        .map(|(def, count)| (def.name, count))
        .collect();
    for (column, count) in malformed.iter().filter(|(_, count)| *count > 0) {
        warn!(
            "{} value(s) in column {} could not be parsed and were set to missing",
            count, column
        );
    }
    info!("Normalized {} rows", records.len());

    Ok(NormalizedRows { records, malformed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{full_row, sample_raw_table, source_columns};
    use crate::types::columns::{DATE, LINE_SETPOINT, SPEED};
    use chrono::NaiveDate;

    #[test]
    fn test_positions_match_column_table() {
        assert_eq!(MEASUREMENT_COLUMNS[FIRST_METRIC_POS].name, EGGS_COUNTED);
        assert_eq!(MEASUREMENT_COLUMNS[FIRST_METRIC_POS + 16].name, LINE_SETPOINT);
        assert_eq!(MEASUREMENT_COLUMNS[OFFSET_POS].name, LOCAL_DATE_TIME_OFFSET);
        assert_eq!(MEASUREMENT_COLUMNS[DATE_POS].name, DATE);
    }

    #[test]
    fn test_unparsable_speed_becomes_missing_without_dropping_row(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let normalized = normalize(&sample_raw_table())?;

        assert_eq!(normalized.records.len(), 3);
        assert_eq!(normalized.records[1].speed, None);
        assert_eq!(normalized.records[1].eggs_counted, Some(1210.0));
        assert_eq!(normalized.records[0].speed, Some(12.5));

        let speed_malformed = normalized
            .malformed
            .iter()
            .find(|(name, _)| *name == SPEED)
            .map(|(_, count)| *count);
        assert_eq!(speed_malformed, Some(1));
        let total_malformed: usize = normalized.malformed.iter().map(|(_, c)| c).sum();
        assert_eq!(total_malformed, 1);
        Ok(())
    }

    #[test]
    fn test_row_order_and_types_are_preserved() -> Result<(), Box<dyn std::error::Error>> {
        let normalized = normalize(&sample_raw_table())?;
        let first = &normalized.records[0];
        assert_eq!(first.account_id, Some(76));
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(
            first.upload_local_date_time,
            NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(6, 0, 0))
        );
        assert_eq!(first.local_date_time_offset.as_deref(), Some("+01:00"));

        let uploads: Vec<_> = normalized
            .records
            .iter()
            .map(|r| r.upload_local_date_time)
            .collect();
        let mut sorted = uploads.clone();
        sorted.sort();
        assert_eq!(uploads, sorted);
        Ok(())
    }

    #[test]
    fn test_missing_projected_column_is_an_error() {
        let columns: Vec<&str> = source_columns()
            .into_iter()
            .filter(|c| *c != SPEED)
            .collect();
        let raw = RawTable::new(columns);
        assert!(matches!(
            normalize(&raw),
            Err(DatasetError::MissingSourceColumn(c)) if c == SPEED
        ));
    }

    #[test]
    fn test_date_is_cut_from_upload_when_not_projected() -> Result<(), Box<dyn std::error::Error>> {
        let columns: Vec<&str> = source_columns()
            .into_iter()
            .filter(|c| *c != DATE)
            .collect();
        let date_pos = source_columns().iter().position(|c| *c == DATE).unwrap_or(4);
        let mut row = full_row("2024-01-02T23:59:59", "12.5");
        row.remove(date_pos);
        let mut raw = RawTable::new(columns);
        raw.push_row(row)?;

        let normalized = normalize(&raw)?;
        assert_eq!(normalized.records[0].date, NaiveDate::from_ymd_opt(2024, 1, 2));
        Ok(())
    }

    #[test]
    fn test_empty_result_normalizes_to_no_records() -> Result<(), Box<dyn std::error::Error>> {
        let raw = RawTable::new(source_columns());
        let normalized = normalize(&raw)?;
        assert!(normalized.records.is_empty());
        assert!(normalized.malformed.iter().all(|(_, c)| *c == 0));
        Ok(())
    }
}
