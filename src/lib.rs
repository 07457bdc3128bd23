pub mod cli;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod settings;
pub mod utils;
pub mod writers;

pub use error::{PipelineError, Result};
pub use models::{Dataset, Pollutant};
pub use processors::{AggregationPipeline, Dashboard};
