//! The main entry point: fetches count production data for one farm account.

use crate::config::{SourceConfig, WarehouseConfig};
use crate::dataset::fetched_dataset::Dataset;
use crate::dataset::normalize::normalize;
use crate::error::CountProdError;
use crate::query::build_query;
use crate::types::request::FetchRequest;
use crate::warehouse::connection::{EnvToken, Warehouse, WarehouseConnection};
use crate::warehouse::error::WarehouseError;
use crate::warehouse::http::HttpWarehouse;
use crate::warehouse::raw_table::RawTable;
use bon::bon;
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::time::Instant;
use tokio::task;

/// The client for fetching count production measurements.
///
/// A `CountProd` owns a [`Warehouse`] and the description of the document source
/// the query reads from. Each fetch opens its own connection and closes it before
/// returning, whether the query succeeded or not.
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use countprod::{CountProd, CountProdError};
///
/// # async fn run() -> Result<(), CountProdError> {
/// let client = CountProd::from_env()?;
/// let dataset = client
///     .fetch()
///     .account_id(76)
///     .start_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
///     .end_date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
///     .call()
///     .await?;
/// println!("{} rows", dataset.summary().rows);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CountProd<W> {
    warehouse: W,
    source: SourceConfig,
}

impl CountProd<HttpWarehouse<EnvToken>> {
    /// A client for the HTTP warehouse configured through `COUNTPROD_*` environment
    /// variables, authenticating with the token in `COUNTPROD_ACCESS_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`CountProdError::Config`] if the configuration is missing or invalid.
    pub fn from_env() -> Result<Self, CountProdError> {
        let config = WarehouseConfig::from_env()?;
        Ok(Self::new(HttpWarehouse::new(config, EnvToken::default())))
    }
}

#[bon]
impl<W: Warehouse> CountProd<W> {
    /// Creates a client reading from the default production source.
    pub fn new(warehouse: W) -> Self {
        Self {
            warehouse,
            source: SourceConfig::default(),
        }
    }

    /// Replaces the `OPENROWSET` source the query reads from.
    pub fn with_source(mut self, source: SourceConfig) -> Self {
        self.source = source;
        self
    }

    /// The SQL statement a fetch for `request` would run.
    pub fn query_for(&self, request: &FetchRequest) -> String {
        build_query(&self.source, request)
    }

    /// Fetches all measurements of one account between two dates, both inclusive.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `account_id` - The farm account, at least 1.
    /// * `start_date` - First upload date to include.
    /// * `end_date` - Last upload date to include. Must be after `start_date`.
    ///
    /// # Returns
    ///
    /// A [`Dataset`] with the complete table, the clean view and their summary.
    /// Zero matching rows is not an error; the dataset is then empty.
    ///
    /// # Errors
    ///
    /// Returns [`CountProdError::InvalidAccountId`] or
    /// [`CountProdError::InvalidDateRange`] before contacting the warehouse, and
    /// [`CountProdError::Warehouse`] for connection, authentication or query failures.
    #[builder]
    pub async fn fetch(
        &self,
        account_id: u32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Dataset, CountProdError> {
        let request = FetchRequest::new(account_id, start_date, end_date)?;
        self.fetch_request(&request).await
    }

    /// Fetches the data described by an already validated request.
    ///
    /// See [`Self::fetch`].
    pub async fn fetch_request(&self, request: &FetchRequest) -> Result<Dataset, CountProdError> {
        let sql = self.query_for(request);
        let started = Instant::now();

        info!(
            "Fetching {} days of data for account {} ({})",
            request.range.days(),
            request.account_id,
            request.range
        );
        let connection = self.warehouse.connect().await?;
        let raw = task::spawn(run_and_close(connection, sql)).await??;
        info!(
            "Fetched {} rows for account {} in {:.2?}",
            raw.len(),
            request.account_id,
            started.elapsed()
        );

        let request = *request;
        let dataset = task::spawn_blocking(move || {
            let normalized = normalize(&raw)?;
            let outside = normalized
                .records
                .iter()
                .filter(|r| r.date.is_some_and(|d| !request.range.contains(d)))
                .count();
            if outside > 0 {
                warn!(
                    "{} row(s) have a date outside {} and were kept as returned",
                    outside, request.range
                );
            }
            Dataset::from_normalized(request, &normalized, started.elapsed())
        })
        .await??;

        if dataset.is_empty() {
            info!("No data found for account {} ({})", request.account_id, request.range);
        }
        Ok(dataset)
    }
}

/// Runs `sql` on `connection` and closes it whatever the outcome.
///
/// Spawned as its own task, so the close still happens when the caller stops
/// polling the fetch. Only a panic inside the driver skips it; the connection is
/// then dropped without a close call.
async fn run_and_close<C>(mut connection: C, sql: String) -> Result<RawTable, WarehouseError>
where
    C: WarehouseConnection,
{
    debug!("Running query:\n{}", sql);
    let queried = connection.query(&sql).await;
    if let Err(e) = connection.close().await {
        warn!("Failed to close warehouse connection: {}", e);
    }
    queried
}
