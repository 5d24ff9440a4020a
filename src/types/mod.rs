pub mod columns;
pub mod export_format;
pub mod measurement;
pub mod request;
