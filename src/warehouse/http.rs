//! A [`Warehouse`] that submits SQL statements to an HTTPS endpoint.
//!
//! Each statement is sent as `POST {endpoint}/statements` with a bearer token and a
//! JSON body `{"statement": "...", "timeout_seconds": 300}`. The endpoint answers with
//! `{"columns": ["AccountId", ...], "rows": [[76, "2024-01-01T06:00:00", ...], ...]}`.
//! JSON scalars are handed on as text and `null` as an absent cell, so that type
//! coercion stays in one place (the dataset normalizer).

use crate::config::WarehouseConfig;
use crate::warehouse::connection::{TokenProvider, Warehouse, WarehouseConnection};
use crate::warehouse::error::WarehouseError;
use crate::warehouse::raw_table::RawTable;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct StatementRequest<'a> {
    statement: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct StatementResponse {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone)]
pub struct HttpWarehouse<T> {
    config: WarehouseConfig,
    tokens: T,
}

impl<T: TokenProvider> HttpWarehouse<T> {
    pub fn new(config: WarehouseConfig, tokens: T) -> Self {
        Self { config, tokens }
    }

    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    fn statements_url(&self) -> String {
        format!("{}/statements", self.config.endpoint.trim_end_matches('/'))
    }
}

impl<T: TokenProvider + Sync> Warehouse for HttpWarehouse<T> {
    type Connection = HttpConnection;

    async fn connect(&self) -> Result<HttpConnection, WarehouseError> {
        let token = self.tokens.access_token().await?;
        let client = Client::builder()
            .connect_timeout(self.config.connect_timeout)
            .build()
            .map_err(WarehouseError::ClientBuild)?;
        info!(
            "Opened warehouse connection to {} (connect timeout {:?})",
            self.config.endpoint, self.config.connect_timeout
        );
        Ok(HttpConnection {
            client: Some(client),
            url: self.statements_url(),
            token,
            query_timeout: self.config.query_timeout,
        })
    }
}

pub struct HttpConnection {
    client: Option<Client>,
    url: String,
    token: String,
    query_timeout: Option<Duration>,
}

impl WarehouseConnection for HttpConnection {
    async fn query(&mut self, sql: &str) -> Result<RawTable, WarehouseError> {
        let client = self.client.as_ref().ok_or(WarehouseError::Closed)?;
        let body = StatementRequest {
            statement: sql,
            timeout_seconds: self.query_timeout.map(|t| t.as_secs()),
        };
        let mut request = client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&body);
        if let Some(timeout) = self.query_timeout {
            request = request.timeout(timeout);
        }
        debug!("Submitting statement to {}", self.url);

        let response = request
            .send()
            .await
            .map_err(|e| WarehouseError::from_transport(&self.url, e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(WarehouseError::Authentication(format!(
                "{} answered {}",
                self.url, status
            )));
        }
        if status == StatusCode::BAD_REQUEST {
            let detail = response.text().await.unwrap_or_default();
            return Err(WarehouseError::QueryRejected(detail));
        }
        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", self.url, e);
                return Err(if let Some(status) = e.status() {
                    WarehouseError::HttpStatus {
                        url: self.url.clone(),
                        status,
                        source: e,
                    }
                } else {
                    WarehouseError::from_transport(&self.url, e)
                });
            }
        };

        let parsed: StatementResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                WarehouseError::Timeout(self.url.clone())
            } else {
                WarehouseError::MalformedResponse(self.url.clone(), e)
            }
        })?;
        into_raw_table(parsed)
    }

    async fn close(mut self) -> Result<(), WarehouseError> {
        match self.client.take() {
            Some(_client) => {
                debug!("Closed warehouse connection to {}", self.url);
                Ok(())
            }
            None => Err(WarehouseError::Closed),
        }
    }
}

fn into_raw_table(response: StatementResponse) -> Result<RawTable, WarehouseError> {
    let mut table = RawTable::new(response.columns);
    table.rows.reserve(response.rows.len());
    for row in response.rows {
        table.push_row(row.into_iter().map(cell_text).collect())?;
    }
    Ok(table)
}

fn cell_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
