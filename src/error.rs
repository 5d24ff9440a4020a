use crate::config::ConfigError;
use crate::dataset::error::DatasetError;
use crate::warehouse::error::WarehouseError;
use chrono::NaiveDate;
use std::error::Error as StdError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CountProdError {
    #[error("Account id must be at least 1, got {0}")]
    InvalidAccountId(u32),

    #[error("Start date {start} must be before end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error(transparent)]
    Warehouse(#[from] WarehouseError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl CountProdError {
    /// `true` for errors raised before the warehouse was contacted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CountProdError::InvalidAccountId(_) | CountProdError::InvalidDateRange { .. }
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, CountProdError::Warehouse(e) if e.is_timeout())
    }

    /// A single line describing the failure for the person who triggered the fetch,
    /// including the chain of underlying causes. Timeouts get a hint to narrow
    /// the date range.
    pub fn user_message(&self) -> String {
        if self.is_validation() {
            return self.to_string();
        }
        let mut message = format!("Error fetching data: {}", self);
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        if self.is_timeout() {
            message.push_str(". Tip: try a smaller date range");
        }
        message
    }
}
