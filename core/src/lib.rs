//! Linked list vs. array list microbenchmarks
//!
//! Measures the containers from `std::collections` against each other, plus
//! a primitive vs. boxed integer loop.
//!
//! ## Architecture
//! - Fixture: container state, rebuilt around every invocation that mutates it
//! - Cases: the measured bodies, grouped in the `list` and `wrappers` suites
//! - Bench: sink, warmup/measurement loop, forked runs, statistics, report

pub mod bench;
pub mod cases;
pub mod config;
pub mod error;
pub mod fixture;
pub mod types;

pub use bench::{Blackhole, Harness, InProcessLauncher, ProcessLauncher, RunReport};
pub use cases::{BenchCase, CaseBody, Registry, Suite};
pub use config::BenchConfig;
pub use error::{BenchError, ConfigError};
pub use types::{Mode, OutputUnit};
