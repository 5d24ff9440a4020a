//! The fixed column set of a count production result.
//!
//! Every table this crate produces (complete or clean, in memory, CSV or Parquet)
//! carries exactly these columns, in exactly this order.

pub const ACCOUNT_ID: &str = "AccountId";
pub const UPLOAD_LOCAL_DATE_TIME: &str = "UploadLocalDateTime";
pub const BEST_LOCAL_DATE_TIME: &str = "BestLocalDateTime";
pub const BEST_UTC_DATE_TIME: &str = "BestUtcDateTime";
pub const DATE: &str = "date";
pub const EGGS_COUNTED: &str = "Eggscounted";
pub const EGGS_COUNTED_LEFT: &str = "Eggscountedleft";
pub const EGGS_COUNTED_RIGHT: &str = "Eggscountedright";
pub const EGGS_INCREASE: &str = "Eggsincrease";
pub const ACTUAL_CAPACITY: &str = "Actualcapacity";
pub const TOTAL_CAPACITY: &str = "Totalcapacity";
pub const TOTAL_SETPOINT: &str = "Totalsetpoint";
pub const SPEED: &str = "Speed";
pub const STOPS_COUNTED: &str = "Stopscounted";
pub const RUNNING_TIME: &str = "Runningtime";
pub const CLOCK: &str = "Clock";
pub const LINE_NUMBER: &str = "LineNmbr";
pub const DISTANCE_DONE: &str = "DistanceDone";
pub const DISTANCE_DONE_PERCENT: &str = "DistanceDonePercent";
pub const EGGS_INCREASE_LEFT: &str = "EggsIncreaseLeft";
pub const EGGS_INCREASE_RIGHT: &str = "EggsIncreaseRight";
pub const LINE_SETPOINT: &str = "LineSetpoint";
pub const LOCAL_DATE_TIME_OFFSET: &str = "LocalDateTimeOffset";

/// The semantic type a column is normalized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Integer,
    DateTime,
    Date,
    Float,
    Text,
}

/// Where the warehouse reads a column from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOrigin {
    /// A JSON path inside the source document, exposed with the given SQL type.
    Document {
        sql_type: &'static str,
        path: &'static str,
    },
    /// The first 10 characters of `UploadLocalDateTime`.
    DatePrefix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub origin: ColumnOrigin,
}

impl ColumnDef {
    const fn document(
        name: &'static str,
        kind: ColumnKind,
        sql_type: &'static str,
        path: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            origin: ColumnOrigin::Document { sql_type, path },
        }
    }

    const fn timestamp(name: &'static str, path: &'static str) -> Self {
        Self::document(name, ColumnKind::DateTime, "varchar(50)", path)
    }

    const fn metric(name: &'static str, path: &'static str) -> Self {
        Self::document(name, ColumnKind::Float, "varchar(50)", path)
    }
}

pub const MEASUREMENT_COLUMNS: [ColumnDef; 23] = [
    ColumnDef::document(ACCOUNT_ID, ColumnKind::Integer, "int", "$.AccountId.num"),
    ColumnDef::timestamp(UPLOAD_LOCAL_DATE_TIME, "$.UploadLocalDateTime.string"),
    ColumnDef::timestamp(BEST_LOCAL_DATE_TIME, "$.BestLocalDateTime.string"),
    ColumnDef::timestamp(BEST_UTC_DATE_TIME, "$.BestUtcDateTime.string"),
    ColumnDef {
        name: DATE,
        kind: ColumnKind::Date,
        origin: ColumnOrigin::DatePrefix,
    },
    ColumnDef::metric(EGGS_COUNTED, "$.Measurements.object.Eggscounted.string"),
    ColumnDef::metric(EGGS_COUNTED_LEFT, "$.Measurements.object.Eggscountedleft.string"),
    ColumnDef::metric(EGGS_COUNTED_RIGHT, "$.Measurements.object.Eggscountedright.string"),
    ColumnDef::metric(EGGS_INCREASE, "$.Measurements.object.Eggsincrease.string"),
    ColumnDef::metric(ACTUAL_CAPACITY, "$.Measurements.object.Actualcapacity.string"),
    ColumnDef::metric(TOTAL_CAPACITY, "$.Measurements.object.Totalcapacity.string"),
    ColumnDef::metric(TOTAL_SETPOINT, "$.Measurements.object.Totalsetpoint.string"),
    ColumnDef::metric(SPEED, "$.Measurements.object.Speed.string"),
    ColumnDef::metric(STOPS_COUNTED, "$.Measurements.object.Stopscounted.string"),
    ColumnDef::metric(RUNNING_TIME, "$.Measurements.object.Runningtime.string"),
    ColumnDef::metric(CLOCK, "$.Measurements.object.Clock.string"),
    ColumnDef::metric(LINE_NUMBER, "$.Measurements.object.LineNmbr.string"),
    ColumnDef::metric(DISTANCE_DONE, "$.Measurements.object.DistanceDone.string"),
    ColumnDef::metric(
        DISTANCE_DONE_PERCENT,
        "$.Measurements.object.DistanceDonePercent.string",
    ),
    ColumnDef::metric(EGGS_INCREASE_LEFT, "$.Measurements.object.EggsIncreaseLeft.string"),
    ColumnDef::metric(EGGS_INCREASE_RIGHT, "$.Measurements.object.EggsIncreaseRight.string"),
    ColumnDef::metric(LINE_SETPOINT, "$.Measurements.object.LineSetpoint.string"),
    ColumnDef::document(
        LOCAL_DATE_TIME_OFFSET,
        ColumnKind::Text,
        "varchar(50)",
        "$.Measurements.object.LocalDateTimeOffset.string",
    ),
];

/// The seventeen measurement columns that are coerced from text to numbers.
pub const METRIC_COLUMNS: [&str; 17] = [
    EGGS_COUNTED,
    EGGS_COUNTED_LEFT,
    EGGS_COUNTED_RIGHT,
    EGGS_INCREASE,
    ACTUAL_CAPACITY,
    TOTAL_CAPACITY,
    TOTAL_SETPOINT,
    SPEED,
    STOPS_COUNTED,
    RUNNING_TIME,
    CLOCK,
    LINE_NUMBER,
    DISTANCE_DONE,
    DISTANCE_DONE_PERCENT,
    EGGS_INCREASE_LEFT,
    EGGS_INCREASE_RIGHT,
    LINE_SETPOINT,
];

/// Column names in output order.
pub fn column_names() -> impl Iterator<Item = &'static str> {
    MEASUREMENT_COLUMNS.iter().map(|c| c.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_column_names_are_unique() {
        let names: HashSet<&str> = column_names().collect();
        assert_eq!(names.len(), MEASUREMENT_COLUMNS.len());
    }

    #[test]
    fn test_metric_columns_are_the_float_columns() {
        let floats: Vec<&str> = MEASUREMENT_COLUMNS
            .iter()
            .filter(|c| c.kind == ColumnKind::Float)
            .map(|c| c.name)
            .collect();
        assert_eq!(floats, METRIC_COLUMNS.to_vec());
    }

    #[test]
    fn test_only_date_is_derived() {
        let derived: Vec<&str> = MEASUREMENT_COLUMNS
            .iter()
            .filter(|c| c.origin == ColumnOrigin::DatePrefix)
            .map(|c| c.name)
            .collect();
        assert_eq!(derived, vec![DATE]);
    }
}
