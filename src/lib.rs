//! Monte Carlo estimation of π split across worker threads.
//!
//! The binary lives in `src/main.rs`; everything it runs is exposed here so
//! the sampler can be driven and tested directly.

pub mod cli;
pub mod config;
pub mod error;
pub mod monte_carlo;

pub use config::Config;
pub use error::PiError;
pub use monte_carlo::{Estimate, Sampler};
