use crate::warehouse::connection::{Warehouse, WarehouseConnection};
use crate::warehouse::error::WarehouseError;
use crate::warehouse::raw_table::RawTable;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// A failure an [`InMemoryWarehouse`] reproduces on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedFailure {
    /// `connect()` fails: the store cannot be reached.
    Unavailable,
    /// `connect()` fails: the credentials are refused.
    Authentication,
    /// `query()` fails after the connection was opened.
    Timeout,
}

#[derive(Default)]
struct MemoryState {
    opened: AtomicUsize,
    closed: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

/// A warehouse that answers every query with the same table.
///
/// Used to drive the fetch pipeline without a network. Clones share their
/// bookkeeping, so a test can keep a handle while the client owns another.
#[derive(Clone)]
pub struct InMemoryWarehouse {
    table: RawTable,
    failure: Option<ScriptedFailure>,
    latency: Option<Duration>,
    state: Arc<MemoryState>,
}

impl InMemoryWarehouse {
    pub fn new(table: RawTable) -> Self {
        Self {
            table,
            failure: None,
            latency: None,
            state: Arc::new(MemoryState::default()),
        }
    }

    /// Makes every query take at least `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn failing(failure: ScriptedFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::new(RawTable::default())
        }
    }

    pub fn connections_opened(&self) -> usize {
        self.state.opened.load(Ordering::SeqCst)
    }

    pub fn connections_closed(&self) -> usize {
        self.state.closed.load(Ordering::SeqCst)
    }

    /// Every statement received so far, in order.
    pub fn queries(&self) -> Vec<String> {
        lock(&self.state.queries).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Warehouse for InMemoryWarehouse {
    type Connection = InMemoryConnection;

    async fn connect(&self) -> Result<InMemoryConnection, WarehouseError> {
        match self.failure {
            Some(ScriptedFailure::Unavailable) => Err(WarehouseError::Unavailable(
                "in-memory warehouse is offline".to_string(),
            )),
            Some(ScriptedFailure::Authentication) => Err(WarehouseError::Authentication(
                "in-memory warehouse refused the credentials".to_string(),
            )),
            _ => {
                self.state.opened.fetch_add(1, Ordering::SeqCst);
                Ok(InMemoryConnection {
                    table: self.table.clone(),
                    failure: self.failure,
                    latency: self.latency,
                    state: Arc::clone(&self.state),
                })
            }
        }
    }
}

pub struct InMemoryConnection {
    table: RawTable,
    failure: Option<ScriptedFailure>,
    latency: Option<Duration>,
    state: Arc<MemoryState>,
}

impl WarehouseConnection for InMemoryConnection {
    async fn query(&mut self, sql: &str) -> Result<RawTable, WarehouseError> {
        lock(&self.state.queries).push(sql.to_string());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failure == Some(ScriptedFailure::Timeout) {
            return Err(WarehouseError::Timeout("in-memory warehouse".to_string()));
        }
        Ok(self.table.clone())
    }

    async fn close(self) -> Result<(), WarehouseError> {
        self.state.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
