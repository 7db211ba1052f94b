pub mod aggregate;
pub mod cli;
pub mod config;
pub mod format;
pub mod observability;
pub mod orchestrator;
pub mod pipeline;
pub mod sinks;
pub mod sources;

pub use orchestrator::{FailurePolicy, Orchestrator};
pub use pipeline::{Envelope, Pipeline, PipelineError};
