pub mod pipeline;

pub use pipeline::{aggregate_in_chunks, PipelineError, PointsPipeline};
