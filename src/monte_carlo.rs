//! Monte Carlo estimation of π over a square and its inscribed circle.
//!
//! The total sample count is split evenly across a fixed set of OS threads.
//! The coordinating thread samples the remainder while the workers run, then
//! joins them and folds every partial count into one [`Accumulator`].

use std::io;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::error::PiError;

/// Odd multiplier used to spread stream indices across the seed space.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Geometry of the bounding square and its inscribed circle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Square {
    side: u32,
    center: u64,
    squared_radius: u64,
}

impl Square {
    pub fn new(side: u32) -> Self {
        let half = u64::from(side / 2);
        Self {
            side,
            center: half,
            squared_radius: half * half,
        }
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    /// Whether `(x, y)` lies strictly inside the inscribed circle.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        // dx, dy <= side / 2, so the sum of squares stays below 2^63.
        let dx = u64::from(x).abs_diff(self.center);
        let dy = u64::from(y).abs_diff(self.center);
        dx * dx + dy * dy < self.squared_radius
    }
}

/// Even split of a sample count across workers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    pub workers: usize,
    pub per_worker: u64,
    pub remainder: u64,
}

impl Partition {
    pub fn new(total_samples: u64, workers: usize) -> Self {
        let divisor = workers as u64;
        Self {
            workers,
            per_worker: total_samples.checked_div(divisor).unwrap_or(0),
            remainder: total_samples.checked_rem(divisor).unwrap_or(total_samples),
        }
    }

    /// Samples covered by the workers plus the coordinator's remainder.
    pub fn total(&self) -> u64 {
        self.per_worker * self.workers as u64 + self.remainder
    }
}

/// Seed of the random stream with the given index. Index 0 belongs to the
/// coordinator, workers use their 1-based id.
pub fn seed_for(master_seed: u64, index: usize) -> u64 {
    master_seed ^ (index as u64).wrapping_mul(SEED_STRIDE)
}

/// Draw `cycles` points in the square and count those inside the circle.
pub fn sample<R: Rng>(rng: &mut R, square: &Square, cycles: u64) -> u64 {
    let side = square.side();
    if side == 0 {
        return 0;
    }

    let mut inside = 0;
    for _ in 0..cycles {
        let x = rng.gen_range(0..side);
        let y = rng.gen_range(0..side);
        if square.contains(x, y) {
            inside += 1;
        }
    }
    inside
}

/// Work assigned to a single thread.
#[derive(Clone, Debug)]
pub struct WorkUnit {
    pub id: usize,
    pub cycles: u64,
    pub seed: u64,
    pub square: Square,
    pub verbose: bool,
}

impl WorkUnit {
    pub fn run(self) -> WorkerReport {
        let start = Instant::now();
        if self.verbose {
            println!("Thread_{} started!", self.id);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let inside = sample(&mut rng, &self.square, self.cycles);

        let elapsed = start.elapsed();
        if self.verbose {
            println!("Thread_{} stopped!", self.id);
            println!(
                "Thread_{} execution time was (millis): {:.6}",
                self.id,
                millis(elapsed)
            );
        }

        WorkerReport {
            id: self.id,
            samples: self.cycles,
            inside,
            elapsed,
        }
    }
}

/// What a worker hands back to the coordinator when it finishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: usize,
    pub samples: u64,
    pub inside: u64,
    pub elapsed: Duration,
}

/// Running total of samples drawn and points found inside the circle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Accumulator {
    pub samples: u64,
    pub inside: u64,
}

impl Accumulator {
    pub fn add(&mut self, samples: u64, inside: u64) {
        self.samples += samples;
        self.inside += inside;
    }

    /// `4 * inside / samples`, or 0 when nothing was sampled.
    pub fn estimate(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        4.0 * self.inside as f64 / self.samples as f64
    }
}

/// Result of a complete run.
#[derive(Clone, Debug)]
pub struct Estimate {
    pub pi: f64,
    pub inside: u64,
    pub total_samples: u64,
    pub remainder: u64,
    pub workers: Vec<WorkerReport>,
    pub elapsed: Duration,
}

/// Splits a run across worker threads and aggregates their counts.
#[derive(Clone, Debug)]
pub struct Sampler {
    config: Config,
}

impl Sampler {
    pub fn new(config: Config) -> Result<Self, PiError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn run(&self) -> Result<Estimate, PiError> {
        let start = Instant::now();
        let config = &self.config;
        let square = Square::new(config.side_length);
        let partition = Partition::new(config.total_samples, config.workers);

        info!(
            "sampling {} points on a {}px square with {} threads ({} each, {} remainder), seed {}",
            config.total_samples,
            config.side_length,
            config.workers,
            partition.per_worker,
            partition.remainder,
            config.seed
        );
        if config.verbose {
            println!("Threads used in this run: {}", config.workers);
        }

        let mut handles = Vec::with_capacity(config.workers);
        for id in 1..=config.workers {
            let unit = WorkUnit {
                id,
                cycles: partition.per_worker,
                seed: seed_for(config.seed, id),
                square,
                verbose: config.verbose,
            };
            let spawned = thread::Builder::new()
                .name(format!("Thread_{id}"))
                .spawn(move || unit.run());

            match spawned {
                Ok(handle) => handles.push((id, handle)),
                Err(source) => return Err(abort_spawn(id, source, handles)),
            }
        }

        // The remainder runs here while the workers sample in parallel.
        let mut rng = StdRng::seed_from_u64(seed_for(config.seed, 0));
        let remainder_inside = sample(&mut rng, &square, partition.remainder);

        let workers = join_all(handles)?;

        let mut acc = Accumulator::default();
        for report in &workers {
            acc.add(report.samples, report.inside);
        }
        acc.add(partition.remainder, remainder_inside);

        Ok(Estimate {
            pi: acc.estimate(),
            inside: acc.inside,
            total_samples: acc.samples,
            remainder: partition.remainder,
            workers,
            elapsed: start.elapsed(),
        })
    }
}

/// Join the workers that did start before `id` failed to spawn. Their
/// counts are discarded; the spawn error is what the caller sees.
fn abort_spawn(
    id: usize,
    source: io::Error,
    handles: Vec<(usize, JoinHandle<WorkerReport>)>,
) -> PiError {
    error!("failed to spawn Thread_{id}: {source}");
    match join_all(handles) {
        Ok(reports) => debug!("discarded {} finished workers", reports.len()),
        Err(err) => debug!("worker failure during spawn abort: {err}"),
    }
    PiError::Spawn { id, source }
}

/// Join every worker, even after a failure, and return the first error.
fn join_all(
    handles: Vec<(usize, JoinHandle<WorkerReport>)>,
) -> Result<Vec<WorkerReport>, PiError> {
    let mut reports = Vec::with_capacity(handles.len());
    let mut failure = None;

    for (id, handle) in handles {
        match handle.join().map_err(|_| PiError::WorkerFailed { id }) {
            Ok(report) => {
                debug!(
                    "Thread_{} counted {} of {} samples inside in {:.3}ms",
                    report.id,
                    report.inside,
                    report.samples,
                    millis(report.elapsed)
                );
                reports.push(report);
            }
            Err(err) => {
                error!("{err}");
                failure.get_or_insert(err);
            }
        }
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(reports),
    }
}

pub fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
