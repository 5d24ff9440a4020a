//! Validated inputs of a fetch: the farm account and the calendar-date window.

use crate::CountProdError;
use chrono::{Duration, NaiveDate};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A farm account identifier. Always `>= 1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct AccountId(u32);

impl AccountId {
    pub fn new(id: u32) -> Result<Self, CountProdError> {
        if id == 0 {
            return Err(CountProdError::InvalidAccountId(id));
        }
        Ok(Self(id))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An inclusive calendar-date window with `start < end`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `start >= end`.
    ///
    /// # Errors
    ///
    /// Returns [`CountProdError::InvalidDateRange`] when the start date is not
    /// strictly before the end date.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CountProdError> {
        if start >= end {
            return Err(CountProdError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days between start and end.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// One fetch: an account and a date window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FetchRequest {
    pub account_id: AccountId,
    pub range: DateRange,
}

impl FetchRequest {
    /// Account used when nothing else has been entered.
    pub const DEFAULT_ACCOUNT_ID: u32 = 76;
    /// Length of the default window, ending today.
    pub const DEFAULT_WINDOW_DAYS: i64 = 30;

    pub fn new(account_id: u32, start: NaiveDate, end: NaiveDate) -> Result<Self, CountProdError> {
        Ok(Self {
            account_id: AccountId::new(account_id)?,
            range: DateRange::new(start, end)?,
        })
    }

    /// Account 76 over the 30 days ending at `today`.
    ///
    /// The window is clipped at the earliest representable date.
    ///
    /// # Errors
    ///
    /// Returns [`CountProdError::InvalidDateRange`] only when `today` is the earliest
    /// representable date and no window fits before it.
    pub fn default_for(today: NaiveDate) -> Result<Self, CountProdError> {
        let start = today
            .checked_sub_signed(Duration::days(Self::DEFAULT_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MIN);
        Self::new(Self::DEFAULT_ACCOUNT_ID, start, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_equal_dates_are_rejected() {
        let result = DateRange::new(date(2024, 1, 1), date(2024, 1, 1));
        assert!(matches!(
            result,
            Err(CountProdError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_inverted_dates_are_rejected() {
        let result = DateRange::new(date(2024, 2, 1), date(2024, 1, 1));
        assert!(matches!(
            result,
            Err(CountProdError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_range_days_and_bounds_are_inclusive() -> Result<(), Box<dyn std::error::Error>> {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31))?;
        assert_eq!(range.days(), 30);
        assert!(range.contains(date(2024, 1, 1)));
        assert!(range.contains(date(2024, 1, 31)));
        assert!(!range.contains(date(2024, 2, 1)));
        Ok(())
    }

    #[test]
    fn test_account_zero_is_rejected() {
        assert!(matches!(
            AccountId::new(0),
            Err(CountProdError::InvalidAccountId(0))
        ));
        assert_eq!(AccountId::new(76).map(AccountId::get).ok(), Some(76));
    }

    #[test]
    fn test_default_request() -> Result<(), CountProdError> {
        let request = FetchRequest::default_for(date(2024, 3, 31))?;
        assert_eq!(request.account_id.get(), 76);
        assert_eq!(request.range.start(), date(2024, 3, 1));
        assert_eq!(request.range.end(), date(2024, 3, 31));
        assert_eq!(request.range.days(), 30);
        Ok(())
    }

    #[test]
    fn test_default_request_near_earliest_date() -> Result<(), CountProdError> {
        let today = NaiveDate::MIN + Duration::days(3);
        let request = FetchRequest::default_for(today)?;
        assert_eq!(request.range.start(), NaiveDate::MIN);
        assert_eq!(request.range.days(), 3);

        assert!(matches!(
            FetchRequest::default_for(NaiveDate::MIN),
            Err(CountProdError::InvalidDateRange { .. })
        ));
        Ok(())
    }
}
