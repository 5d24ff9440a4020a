pub mod connection;
pub mod error;
pub mod http;
pub mod memory;
pub mod raw_table;
