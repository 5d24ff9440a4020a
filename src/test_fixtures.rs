//! Warehouse results shared by the unit tests.

use crate::types::columns::{self, column_names};
use crate::warehouse::raw_table::RawTable;

pub(crate) fn source_columns() -> Vec<&'static str> {
    column_names().collect()
}

/// A fully populated source row for account 76, uploaded at `upload`, with
/// `overrides` applied by column name.
pub(crate) fn row_with(upload: &str, overrides: &[(&str, Option<&str>)]) -> Vec<Option<String>> {
    let date_prefix: String = upload.chars().take(10).collect();
    source_columns()
        .into_iter()
        .map(|name| {
            if let Some((_, value)) = overrides.iter().find(|(column, _)| *column == name) {
                return value.map(str::to_string);
            }
            let value = match name {
                columns::ACCOUNT_ID => "76",
                columns::UPLOAD_LOCAL_DATE_TIME | columns::BEST_LOCAL_DATE_TIME => upload,
                columns::BEST_UTC_DATE_TIME => "2024-01-01T05:00:00Z",
                columns::DATE => date_prefix.as_str(),
                columns::EGGS_COUNTED => "1200",
                columns::EGGS_COUNTED_LEFT | columns::EGGS_COUNTED_RIGHT => "600",
                columns::EGGS_INCREASE => "15",
                columns::ACTUAL_CAPACITY => "3000",
                columns::TOTAL_CAPACITY => "3200",
                columns::TOTAL_SETPOINT => "3100",
                columns::SPEED => "12.5",
                columns::STOPS_COUNTED => "0",
                columns::RUNNING_TIME => "360",
                columns::CLOCK => "600",
                columns::LINE_NUMBER => "1",
                columns::DISTANCE_DONE => "150.5",
                columns::DISTANCE_DONE_PERCENT => "75",
                columns::EGGS_INCREASE_LEFT => "8",
                columns::EGGS_INCREASE_RIGHT => "7",
                columns::LINE_SETPOINT => "1600",
                columns::LOCAL_DATE_TIME_OFFSET => "+01:00",
                _ => "",
            };
            Some(value.to_string())
        })
        .collect()
}

pub(crate) fn full_row(upload: &str, speed: &str) -> Vec<Option<String>> {
    row_with(upload, &[(columns::SPEED, Some(speed))])
}

pub(crate) fn table_of(rows: Vec<Vec<Option<String>>>) -> RawTable {
    let mut table = RawTable::new(source_columns());
    for row in rows {
        table
            .push_row(row)
            .expect("fixture rows match the fixture header");
    }
    table
}

/// Account 76, 2024-01-01..2024-01-02: three rows, the second with an
/// unparsable `Speed` and nothing else missing.
pub(crate) fn sample_raw_table() -> RawTable {
    table_of(vec![
        full_row("2024-01-01T06:00:00", "12.5"),
        row_with(
            "2024-01-01T07:00:00",
            &[
                (columns::SPEED, Some("n/a")),
                (columns::EGGS_COUNTED, Some("1210")),
            ],
        ),
        full_row("2024-01-02T06:00:00", "13"),
    ])
}

/// Rows exercising text-encoding edge cases: a comma inside the offset and an
/// absent metric.
pub(crate) fn awkward_raw_table() -> RawTable {
    table_of(vec![
        row_with(
            "2024-01-01T06:00:00",
            &[(columns::LOCAL_DATE_TIME_OFFSET, Some("+01:00, CET"))],
        ),
        row_with("2024-01-01T07:00:00", &[(columns::CLOCK, None)]),
    ])
}
