//! Per-case results and the printed summary

use super::stats::Statistics;
use crate::cases::Suite;
use crate::error::BenchError;
use crate::types::{ForkRecord, Mode, OutputUnit};
use serde::{Deserialize, Serialize};
use std::fmt;

const RULE_WIDTH: usize = 92;

/// A fork that did not complete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForkFailure {
    pub fork_index: u32,
    pub reason: String,
}

/// Aggregated result of one case in one mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    pub case: String,
    pub suite: Suite,
    pub mode: Mode,
    pub unit: OutputUnit,
    pub forks: u32,
    /// Mean score of each completed fork
    pub fork_scores: Vec<f64>,
    pub failures: Vec<ForkFailure>,
    /// Over all measurement iterations of all completed forks
    pub statistics: Option<Statistics>,
}

impl CaseReport {
    pub fn from_forks(
        case: &str,
        suite: Suite,
        mode: Mode,
        unit: OutputUnit,
        forks: Vec<Result<ForkRecord, BenchError>>,
    ) -> Self {
        let fork_count = forks.len() as u32;
        let mut fork_scores = Vec::new();
        let mut all_scores = Vec::new();
        let mut failures = Vec::new();

        for (index, fork) in forks.into_iter().enumerate() {
            match fork {
                Ok(record) => {
                    let scores: Vec<f64> = record
                        .measurement
                        .iter()
                        .map(|it| it.score(mode, unit))
                        .collect();
                    if let Some(stats) = Statistics::from_scores(&scores) {
                        fork_scores.push(stats.score);
                    }
                    all_scores.extend(scores);
                }
                Err(e) => failures.push(ForkFailure {
                    fork_index: index as u32,
                    reason: e.to_string(),
                }),
            }
        }

        Self {
            case: case.to_string(),
            suite,
            mode,
            unit,
            forks: fork_count,
            fork_scores,
            failures,
            statistics: Statistics::from_scores(&all_scores),
        }
    }

    /// Every fork completed
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.statistics.is_some()
    }
}

impl fmt::Display for CaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = self.unit.score_label(self.mode);
        match &self.statistics {
            Some(stats) => {
                let error = stats
                    .error
                    .map(|e| format!("± {:>14.3}", e))
                    .unwrap_or_else(|| format!("{:>16}", ""));
                write!(
                    f,
                    "{:<26} {:>6} {:>4} {:>16.3} {} {:<7}",
                    self.case, self.mode, stats.samples, stats.score, error, units
                )?;
            }
            None => {
                write!(f, "{:<26} {:>6} {:>4} {:>16} {:>16} {:<7}", self.case, self.mode, 0, "-", "", units)?;
            }
        }
        if !self.failures.is_empty() {
            write!(f, "  INCOMPLETE ({}/{} forks failed)", self.failures.len(), self.forks)?;
        }
        Ok(())
    }
}

/// Results of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub forks: u32,
    pub warmup_iterations: u32,
    pub measurement_iterations: u32,
    pub cpus: usize,
    pub cases: Vec<CaseReport>,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.cases.iter().all(CaseReport::is_complete)
    }

    /// Process exit status for this run: 0 only when every fork completed
    pub fn exit_status(&self) -> u8 {
        if self.is_complete() {
            0
        } else {
            1
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = (&CaseReport, &ForkFailure)> {
        self.cases
            .iter()
            .flat_map(|c| c.failures.iter().map(move |f| (c, f)))
    }

    pub fn get(&self, case: &str, mode: Mode) -> Option<&CaseReport> {
        self.cases.iter().find(|c| c.case == case && c.mode == mode)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "═".repeat(RULE_WIDTH);
        writeln!(f, "╔{}╗", rule)?;
        writeln!(
            f,
            "║ {:<w$} ║",
            format!(
                "LISTBENCH | forks: {} | warmup: {} | measurement: {} | cpus: {}",
                self.forks, self.warmup_iterations, self.measurement_iterations, self.cpus
            ),
            w = RULE_WIDTH - 2
        )?;
        writeln!(f, "╠{}╣", rule)?;
        writeln!(
            f,
            "║ {:<w$} ║",
            format!(
                "{:<26} {:>6} {:>4} {:>16} {:>16} {:<7}",
                "Benchmark", "Mode", "Cnt", "Score", "Error", "Units"
            ),
            w = RULE_WIDTH - 2
        )?;
        for case in &self.cases {
            writeln!(f, "║ {:<w$} ║", case.to_string(), w = RULE_WIDTH - 2)?;
        }
        writeln!(f, "╚{}╝", rule)?;

        for (case, failure) in self.failures() {
            writeln!(f, "❌ {} ({}) fork #{}: {}", case.case, case.mode, failure.fork_index, failure.reason)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IterationResult;

    fn record(fork_index: u32, elapsed_ns: &[u64]) -> ForkRecord {
        ForkRecord {
            case: "append-array".to_string(),
            mode: Mode::Throughput,
            fork_index,
            warmup: vec![],
            measurement: elapsed_ns
                .iter()
                .map(|&ns| IterationResult { operations: 1, elapsed_ns: ns })
                .collect(),
        }
    }

    #[test]
    fn test_aggregates_across_forks() {
        let report = CaseReport::from_forks(
            "append-array",
            Suite::List,
            Mode::Throughput,
            OutputUnit::Seconds,
            vec![
                Ok(record(0, &[1_000_000_000, 500_000_000])),
                Ok(record(1, &[250_000_000])),
            ],
        );

        assert!(report.is_complete());
        assert_eq!(report.fork_scores, vec![1.5, 4.0]);
        let stats = report.statistics.unwrap();
        assert_eq!(stats.samples, 3);
        assert!((stats.score - 7.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_failed_fork_marks_incomplete() {
        let report = CaseReport::from_forks(
            "append-array",
            Suite::List,
            Mode::Throughput,
            OutputUnit::Seconds,
            vec![
                Err(BenchError::BodyPanicked {
                    case: "append-array".to_string(),
                    fork: 0,
                    message: "boom".to_string(),
                }),
                Ok(record(1, &[1_000_000_000])),
            ],
        );

        assert!(!report.is_complete());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].fork_index, 0);
        assert!(report.failures[0].reason.contains("boom"));
        assert_eq!(report.statistics.as_ref().unwrap().samples, 1);
        assert!(report.to_string().contains("INCOMPLETE (1/2 forks failed)"));
    }

    #[test]
    fn test_table_lists_every_case() {
        let run = RunReport {
            forks: 1,
            warmup_iterations: 3,
            measurement_iterations: 3,
            cpus: 4,
            cases: vec![CaseReport::from_forks(
                "append-array",
                Suite::List,
                Mode::Throughput,
                OutputUnit::Seconds,
                vec![Ok(record(0, &[1_000_000_000]))],
            )],
        };

        assert_eq!(run.exit_status(), 0);
        let table = run.to_string();
        assert!(table.contains("append-array"));
        assert!(table.contains("ops/s"));
        assert!(run.get("append-array", Mode::Throughput).is_some());
        assert!(run.get("append-array", Mode::AverageTime).is_none());
    }
}
