//! The seam between this crate and the remote analytical store.
//!
//! A [`Warehouse`] hands out connections; a [`WarehouseConnection`] runs one
//! SQL statement at a time and is closed explicitly when the fetch is over.
//! Authentication is delegated to a [`TokenProvider`] so that interactive or
//! identity-based flows stay outside this crate.

use crate::warehouse::error::WarehouseError;
use crate::warehouse::raw_table::RawTable;
use std::future::Future;

pub trait Warehouse {
    type Connection: WarehouseConnection + 'static;

    /// Opens (and authenticates) a new connection.
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, WarehouseError>> + Send;
}

pub trait WarehouseConnection: Send {
    /// Executes `sql` and returns the whole result.
    fn query(
        &mut self,
        sql: &str,
    ) -> impl Future<Output = Result<RawTable, WarehouseError>> + Send;

    /// Releases the connection. Called exactly once per opened connection.
    fn close(self) -> impl Future<Output = Result<(), WarehouseError>> + Send;
}

/// Supplies a bearer token for warehouse requests.
pub trait TokenProvider {
    fn access_token(&self) -> impl Future<Output = Result<String, WarehouseError>> + Send;
}

/// A token obtained elsewhere, e.g. by an interactive sign-in in the UI layer.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, WarehouseError> {
        Ok(self.0.clone())
    }
}

/// Reads the token from an environment variable on every connect.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub const DEFAULT_VAR: &'static str = "COUNTPROD_ACCESS_TOKEN";

    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VAR)
    }
}

impl TokenProvider for EnvToken {
    async fn access_token(&self) -> Result<String, WarehouseError> {
        match std::env::var(&self.var) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(WarehouseError::Authentication(format!(
                "no access token in environment variable {}",
                self.var
            ))),
        }
    }
}
