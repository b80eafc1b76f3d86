//! Benchmark harness
//! Sink, measurement loop, fork launchers, aggregation and reporting

pub mod blackhole;
pub mod fork;
pub mod harness;
pub mod report;
pub mod runner;
pub mod stats;

pub use blackhole::Blackhole;
pub use fork::{run_child, ForkLauncher, InProcessLauncher, ProcessLauncher, FORK_CHILD_COMMAND};
pub use harness::Harness;
pub use report::{CaseReport, ForkFailure, RunReport};
pub use runner::{run_fork, run_iteration};
pub use stats::Statistics;
