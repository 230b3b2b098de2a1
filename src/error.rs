use std::io;

use thiserror::Error;

/// Errors raised while configuring or running an estimation.
#[derive(Debug, Error)]
pub enum PiError {
    #[error("side length must be a positive integer")]
    InvalidSideLength,
    #[error("thread count must be a positive integer")]
    InvalidWorkerCount,
    #[error("sample count must be a positive integer")]
    InvalidSampleCount,
    #[error("Illegal argument \"{0}\"!")]
    IllegalArgument(String),
    #[error("failed to spawn Thread_{id}: {source}")]
    Spawn {
        id: usize,
        #[source]
        source: io::Error,
    },
    #[error("Thread_{id} panicked before reporting its count")]
    WorkerFailed { id: usize },
}
