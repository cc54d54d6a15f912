pub mod config;
pub mod dataset;
pub mod errors;
pub mod image;
pub mod model;
pub mod resolve;

pub mod doctor;
pub mod report;

pub use dataset::{load_data, Dataset, LazyDataset};
pub use errors::LensError;
pub use resolve::resolve;
