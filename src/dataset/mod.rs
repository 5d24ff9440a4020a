pub mod download;
pub mod error;
pub mod export;
pub mod fetched_dataset;
pub mod measurement_frame;
pub mod normalize;
pub mod summary;
