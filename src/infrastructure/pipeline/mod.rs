//! The text-to-video model, seen from the server as an opaque blocking call.

pub mod command;

pub use command::CommandPipeline;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("pipeline config not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("pipeline executable not found: {0}")]
    ExecutableNotFound(String),

    #[error("failed to launch pipeline: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("{0}")]
    Failed(String),
}

/// One generation request as handed to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    pub prompt: String,
    pub duration_secs: u32,
    pub width: u32,
    pub height: u32,
    pub save_path: PathBuf,
}

pub trait VideoPipeline: Send + Sync {
    /// Runs the model to completion and writes the video to `job.save_path`.
    /// Blocks the calling thread for the whole generation.
    fn generate(&self, job: &GenerationJob) -> Result<(), PipelineError>;
}
