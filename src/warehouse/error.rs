use thiserror::Error;

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("Failed to build warehouse HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Could not connect to warehouse at {url}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Warehouse unavailable: {0}")]
    Unavailable(String),

    #[error("Authentication against the warehouse failed: {0}")]
    Authentication(String),

    #[error("Query against {0} timed out")]
    Timeout(String),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Warehouse rejected the query: {0}")]
    QueryRejected(String),

    #[error("Failed to decode warehouse response from {0}")]
    MalformedResponse(String, #[source] reqwest::Error),

    #[error("Row {row} has {found} cells but the result declares {expected} columns")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Connection was already closed")]
    Closed,
}

impl WarehouseError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, WarehouseError::Timeout(_))
    }

    /// Maps a transport error from `reqwest` onto the failure kinds callers act on.
    pub(crate) fn from_transport(url: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WarehouseError::Timeout(url.to_string())
        } else if e.is_connect() {
            WarehouseError::Connect {
                url: url.to_string(),
                source: e,
            }
        } else {
            WarehouseError::NetworkRequest(url.to_string(), e)
        }
    }
}
