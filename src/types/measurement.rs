use chrono::{NaiveDate, NaiveDateTime};

/// One normalized row of count production data.
///
/// Every field is optional: a cell that was absent at the source, or whose text
/// could not be coerced into the column's type, is `None`.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct MeasurementRecord {
    pub account_id: Option<i64>,                        // AccountId
    pub upload_local_date_time: Option<NaiveDateTime>,  // UploadLocalDateTime
    pub best_local_date_time: Option<NaiveDateTime>,    // BestLocalDateTime
    pub best_utc_date_time: Option<NaiveDateTime>,      // BestUtcDateTime
    pub date: Option<NaiveDate>,                        // date
    pub eggs_counted: Option<f64>,                      // Eggscounted
    pub eggs_counted_left: Option<f64>,                 // Eggscountedleft
    pub eggs_counted_right: Option<f64>,                // Eggscountedright
    pub eggs_increase: Option<f64>,                     // Eggsincrease
    pub actual_capacity: Option<f64>,                   // Actualcapacity
    pub total_capacity: Option<f64>,                    // Totalcapacity
    pub total_setpoint: Option<f64>,                    // Totalsetpoint
    pub speed: Option<f64>,                             // Speed
    pub stops_counted: Option<f64>,                     // Stopscounted
    pub running_time: Option<f64>,                      // Runningtime
    pub clock: Option<f64>,                             // Clock
    pub line_number: Option<f64>,                       // LineNmbr
    pub distance_done: Option<f64>,                     // DistanceDone
    pub distance_done_percent: Option<f64>,             // DistanceDonePercent
    pub eggs_increase_left: Option<f64>,                // EggsIncreaseLeft
    pub eggs_increase_right: Option<f64>,               // EggsIncreaseRight
    pub line_setpoint: Option<f64>,                     // LineSetpoint
    pub local_date_time_offset: Option<String>,         // LocalDateTimeOffset
}

impl MeasurementRecord {
    /// The seventeen metric values, in column order.
    pub fn metrics(&self) -> [Option<f64>; 17] {
        [
            self.eggs_counted,
            self.eggs_counted_left,
            self.eggs_counted_right,
            self.eggs_increase,
            self.actual_capacity,
            self.total_capacity,
            self.total_setpoint,
            self.speed,
            self.stops_counted,
            self.running_time,
            self.clock,
            self.line_number,
            self.distance_done,
            self.distance_done_percent,
            self.eggs_increase_left,
            self.eggs_increase_right,
            self.line_setpoint,
        ]
    }

    /// Mutable access to the metric values, in the same order as [`Self::metrics`].
    pub fn metrics_mut(&mut self) -> [&mut Option<f64>; 17] {
        [
            &mut self.eggs_counted,
            &mut self.eggs_counted_left,
            &mut self.eggs_counted_right,
            &mut self.eggs_increase,
            &mut self.actual_capacity,
            &mut self.total_capacity,
            &mut self.total_setpoint,
            &mut self.speed,
            &mut self.stops_counted,
            &mut self.running_time,
            &mut self.clock,
            &mut self.line_number,
            &mut self.distance_done,
            &mut self.distance_done_percent,
            &mut self.eggs_increase_left,
            &mut self.eggs_increase_right,
            &mut self.line_setpoint,
        ]
    }

    /// Number of missing cells across all 23 columns.
    pub fn missing_count(&self) -> usize {
        let fixed = [
            self.account_id.is_none(),
            self.upload_local_date_time.is_none(),
            self.best_local_date_time.is_none(),
            self.best_utc_date_time.is_none(),
            self.date.is_none(),
            self.local_date_time_offset.is_none(),
        ];
        fixed.iter().filter(|missing| **missing).count()
            + self.metrics().iter().filter(|m| m.is_none()).count()
    }

    /// `true` when no column is missing, i.e. the row belongs to the clean view.
    pub fn is_complete(&self) -> bool {
        self.missing_count() == 0
    }
}
