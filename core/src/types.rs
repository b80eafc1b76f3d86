//! Core types shared by the harness, the fixtures and the fork protocol

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Benchmark mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Operations per unit of time
    Throughput,
    /// Time per operation
    AverageTime,
}

impl Mode {
    pub fn short_name(&self) -> &'static str {
        match self {
            Mode::Throughput => "thrpt",
            Mode::AverageTime => "avgt",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.short_name())
    }
}

/// Unit scores are reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputUnit {
    Seconds,
    Milliseconds,
    Microseconds,
    Nanoseconds,
}

impl OutputUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            OutputUnit::Seconds => "s",
            OutputUnit::Milliseconds => "ms",
            OutputUnit::Microseconds => "us",
            OutputUnit::Nanoseconds => "ns",
        }
    }

    /// Nanoseconds in one unit
    pub fn nanos(&self) -> f64 {
        match self {
            OutputUnit::Seconds => 1_000_000_000.0,
            OutputUnit::Milliseconds => 1_000_000.0,
            OutputUnit::Microseconds => 1_000.0,
            OutputUnit::Nanoseconds => 1.0,
        }
    }

    /// Label of a score in `mode` expressed in this unit, e.g. `ops/s` or `ms/op`
    pub fn score_label(&self, mode: Mode) -> String {
        match mode {
            Mode::Throughput => format!("ops/{}", self.symbol()),
            Mode::AverageTime => format!("{}/op", self.symbol()),
        }
    }
}

impl fmt::Display for OutputUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.symbol())
    }
}

/// How often a fixture is rebuilt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Once per fork
    Trial,
    /// Around every single invocation of the case body
    Invocation,
}

/// One warmup or measurement iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationResult {
    /// Invocations of the case body completed in this iteration
    pub operations: u64,
    /// Summed time spent inside the case body, setup and teardown excluded
    pub elapsed_ns: u64,
}

impl IterationResult {
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_ns)
    }

    /// Score of this iteration in `mode`, expressed in `unit`.
    ///
    /// A zero elapsed time (timer resolution) is clamped to one nanosecond so
    /// the throughput stays finite.
    pub fn score(&self, mode: Mode, unit: OutputUnit) -> f64 {
        let elapsed_units = self.elapsed_ns.max(1) as f64 / unit.nanos();
        let ops = self.operations as f64;
        match mode {
            Mode::Throughput => ops / elapsed_units,
            Mode::AverageTime => {
                if self.operations == 0 {
                    0.0
                } else {
                    elapsed_units / ops
                }
            }
        }
    }
}

/// Everything a fork needs to run one case in one mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForkPlan {
    pub case: String,
    pub mode: Mode,
    pub unit: OutputUnit,
    pub fork_index: u32,
    pub warmup_iterations: u32,
    pub measurement_iterations: u32,
    pub iteration_time_ms: u64,
    pub runtime: crate::config::RuntimeFlags,
}

impl ForkPlan {
    pub fn iteration_time(&self) -> Duration {
        Duration::from_millis(self.iteration_time_ms)
    }
}

/// Raw samples collected by a completed fork
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForkRecord {
    pub case: String,
    pub mode: Mode,
    pub fork_index: u32,
    pub warmup: Vec<IterationResult>,
    pub measurement: Vec<IterationResult>,
}

/// Outcome of one fork, as printed by a child process
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ForkOutcome {
    Completed(ForkRecord),
    Failed { fork_index: u32, reason: String },
}

impl ForkOutcome {
    pub fn fork_index(&self) -> u32 {
        match self {
            ForkOutcome::Completed(record) => record.fork_index,
            ForkOutcome::Failed { fork_index, .. } => *fork_index,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ForkOutcome::Completed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput_score() {
        let it = IterationResult { operations: 10, elapsed_ns: 2_000_000_000 };
        assert_eq!(it.score(Mode::Throughput, OutputUnit::Seconds), 5.0);
        assert_eq!(it.score(Mode::Throughput, OutputUnit::Milliseconds), 0.005);
    }

    #[test]
    fn test_average_time_score() {
        let it = IterationResult { operations: 4, elapsed_ns: 8_000_000 };
        assert_eq!(it.score(Mode::AverageTime, OutputUnit::Milliseconds), 2.0);
    }

    #[test]
    fn test_zero_elapsed_is_finite() {
        let it = IterationResult { operations: 1, elapsed_ns: 0 };
        let score = it.score(Mode::Throughput, OutputUnit::Seconds);
        assert!(score.is_finite());
        assert!(score > 0.0);
    }

    #[test]
    fn test_outcome_wire_format() {
        let failed = ForkOutcome::Failed { fork_index: 2, reason: "boom".to_string() };
        let json = serde_json::to_string(&failed).unwrap();
        assert!(json.contains("\"status\":\"failed\""));

        let back: ForkOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fork_index(), 2);
        assert!(!back.is_completed());
    }

    #[test]
    fn test_score_labels() {
        assert_eq!(OutputUnit::Seconds.score_label(Mode::Throughput), "ops/s");
        assert_eq!(OutputUnit::Milliseconds.score_label(Mode::AverageTime), "ms/op");
    }
}
