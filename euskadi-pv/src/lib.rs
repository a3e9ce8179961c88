pub mod choropleth;
pub mod collect;
pub mod commons;
pub mod error;
pub mod geo_core;
pub mod geometric;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::config::{ColorOrder, PipelineConfig, ThousandsSeparator};
pub use pipeline::{Pipeline, PipelineInputs};
