//! Run configuration for the estimator.

use crate::error::PiError;

/// Total number of samples drawn when none is requested.
pub const DEFAULT_TOTAL_SAMPLES: u64 = 10_000_000_000;

/// Number of worker threads when none is requested.
pub const DEFAULT_WORKERS: usize = 1;

/// Master seed of a [`Config`] built in code. The `pi` binary replaces it
/// with `--seed` or a random seed, so only library callers see it.
pub const DEFAULT_SEED: u64 = 12345;

/// Parameters of a single estimation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Side of the bounding square, in pixels.
    pub side_length: u32,

    /// Number of worker threads sampling in parallel.
    pub workers: usize,

    /// Total samples across all workers and the coordinator.
    pub total_samples: u64,

    /// Master seed every per-worker stream is derived from.
    pub seed: u64,

    /// Print per-worker progress lines.
    pub verbose: bool,
}

impl Config {
    /// Create a configuration for the given square side with the default
    /// worker count, sample count and [`DEFAULT_SEED`].
    pub fn new(side_length: u32) -> Self {
        Self {
            side_length,
            workers: DEFAULT_WORKERS,
            total_samples: DEFAULT_TOTAL_SAMPLES,
            seed: DEFAULT_SEED,
            verbose: true,
        }
    }

    /// Set the number of worker threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the total sample count.
    pub fn with_total_samples(mut self, total_samples: u64) -> Self {
        self.total_samples = total_samples;
        self
    }

    /// Set the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable per-worker output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Reject configurations that would produce degenerate geometry or an
    /// empty partition.
    pub fn validate(&self) -> Result<(), PiError> {
        if self.side_length == 0 {
            return Err(PiError::InvalidSideLength);
        }
        if self.workers == 0 {
            return Err(PiError::InvalidWorkerCount);
        }
        if self.total_samples == 0 {
            return Err(PiError::InvalidSampleCount);
        }
        Ok(())
    }
}
