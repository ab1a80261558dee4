//! debrief-pipeline
//!
//! Per-submission orchestration: load rubric and case brief, prompt the
//! model, write the narrative back, notify the trainee. Also the three
//! entry points that drive it (row event, sweep, most recent row).

pub mod config;
pub mod error;
pub mod inflight;
pub mod processor;
pub mod triggers;

pub use config::{PipelineConfig, SweepErrorPolicy, TableNames};
pub use error::{ErrorKind, PipelineError};
pub use processor::{FeedbackPipeline, RowOutcome, SkipReason};
pub use triggers::{SweepFailure, SweepReport};
