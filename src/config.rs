//! Connection and source settings for the warehouse.

use bon::Builder;
use std::time::Duration;
use thiserror::Error;

pub const ENV_WAREHOUSE_URL: &str = "COUNTPROD_WAREHOUSE_URL";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "COUNTPROD_CONNECT_TIMEOUT_SECS";
pub const ENV_QUERY_TIMEOUT_SECS: &str = "COUNTPROD_QUERY_TIMEOUT_SECS";

/// Connection timeout applied when a connection is established.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("Environment variable {var} has invalid value '{value}'")]
    InvalidVar { var: &'static str, value: String },
}

/// How to reach the warehouse endpoint.
///
/// # Examples
///
/// ```
/// use countprod::WarehouseConfig;
/// use std::time::Duration;
///
/// let config = WarehouseConfig::builder()
///     .endpoint("https://warehouse.example.com/sql")
///     .query_timeout(Duration::from_secs(300))
///     .build();
/// assert_eq!(config.connect_timeout, Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct WarehouseConfig {
    /// Base URL of the SQL statement endpoint.
    #[builder(into)]
    pub endpoint: String,
    #[builder(default = DEFAULT_CONNECT_TIMEOUT)]
    pub connect_timeout: Duration,
    /// Client-side limit on a single query. `None` leaves it to the warehouse.
    pub query_timeout: Option<Duration>,
}

impl WarehouseConfig {
    /// Reads the configuration from `COUNTPROD_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] if `COUNTPROD_WAREHOUSE_URL` is unset and
    /// [`ConfigError::InvalidVar`] if a timeout is not a whole number of seconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup(ENV_WAREHOUSE_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar(ENV_WAREHOUSE_URL))?;
        let connect_timeout = parse_secs(&lookup, ENV_CONNECT_TIMEOUT_SECS)?
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        let query_timeout = parse_secs(&lookup, ENV_QUERY_TIMEOUT_SECS)?;

        Ok(Self::builder()
            .endpoint(endpoint.trim())
            .connect_timeout(connect_timeout)
            .maybe_query_timeout(query_timeout)
            .build())
    }
}

fn parse_secs<F>(lookup: &F, var: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ConfigError::InvalidVar { var, value }),
    }
}

/// The `OPENROWSET` source the count production documents are read from.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct SourceConfig {
    #[builder(into, default = "CosmosDB".to_string())]
    pub provider: String,
    #[builder(
        into,
        default = "Account=cs-meggsiusarchive-prod-westeurope;Database=VencomaticIOT".to_string()
    )]
    pub connection: String,
    #[builder(into, default = "MeggsiusCountProductionData".to_string())]
    pub object: String,
    #[builder(into, default = "cs-meggsiusarchive-prod-westeurope".to_string())]
    pub server_credential: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
