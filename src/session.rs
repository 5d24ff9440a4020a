//! Holds the most recent fetch between user actions.

use crate::countprod::CountProd;
use crate::dataset::fetched_dataset::Dataset;
use crate::error::CountProdError;
use crate::types::request::FetchRequest;
use crate::warehouse::connection::Warehouse;
use chrono::NaiveDate;
use log::info;

/// Outcome of a successful [`Session::fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// The fetch returned this many rows.
    Rows(usize),
    /// The query matched nothing.
    Empty,
}

/// The last fetched dataset of one user.
///
/// A successful fetch replaces the held dataset, even when it returned no rows.
/// A failed fetch leaves it as it was.
#[derive(Debug, Default)]
pub struct Session {
    dataset: Option<Dataset>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn has_data(&self) -> bool {
        self.dataset.is_some()
    }

    /// Stores `dataset`, returning the one it replaces.
    pub fn replace(&mut self, dataset: Dataset) -> Option<Dataset> {
        self.dataset.replace(dataset)
    }

    pub fn clear(&mut self) {
        self.dataset = None;
    }

    /// Validates the inputs, fetches through `client` and stores the result.
    ///
    /// # Errors
    ///
    /// Validation errors are returned before the warehouse is contacted. Any error
    /// leaves the previously held dataset in place.
    pub async fn fetch<W: Warehouse>(
        &mut self,
        client: &CountProd<W>,
        account_id: u32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<FetchStatus, CountProdError> {
        let request = FetchRequest::new(account_id, start_date, end_date)?;
        self.fetch_request(client, &request).await
    }

    /// Same as [`Self::fetch`] for an already validated request.
    pub async fn fetch_request<W: Warehouse>(
        &mut self,
        client: &CountProd<W>,
        request: &FetchRequest,
    ) -> Result<FetchStatus, CountProdError> {
        let dataset = client.fetch_request(request).await?;
        let status = match dataset.summary().rows {
            0 => FetchStatus::Empty,
            rows => FetchStatus::Rows(rows),
        };
        if self.replace(dataset).is_some() {
            info!("Replaced previous dataset with fetch for account {}", request.account_id);
        }
        Ok(status)
    }
}
