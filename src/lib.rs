mod config;
mod countprod;
mod dataset;
mod error;
mod query;
mod session;
mod types;
mod utils;
mod warehouse;

#[cfg(test)]
mod test_fixtures;

pub use countprod::CountProd;
pub use error::CountProdError;
pub use query::build_query;
pub use session::*;

pub use config::*;

pub use types::columns::*;
pub use types::export_format::*;
pub use types::measurement::MeasurementRecord;
pub use types::request::*;

pub use dataset::download::*;
pub use dataset::export::*;
pub use dataset::fetched_dataset::Dataset;
pub use dataset::measurement_frame::*;
pub use dataset::normalize::{normalize, NormalizedRows};
pub use dataset::summary::*;

pub use warehouse::connection::*;
pub use warehouse::http::{HttpConnection, HttpWarehouse};
pub use warehouse::memory::*;
pub use warehouse::raw_table::RawTable;

pub use dataset::error::DatasetError;
pub use warehouse::error::WarehouseError;
