pub mod dataset_loader;
pub mod table_reader;

pub use dataset_loader::{DataPaths, DatasetLoader};
pub use table_reader::{InvalidRows, TableReader};
