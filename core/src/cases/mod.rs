//! Benchmark case registry
//!
//! Two suites are registered: `list` compares the linked list against the
//! array list, `wrappers` compares a primitive loop counter against a boxed one.

pub mod list;
pub mod wrappers;

use crate::bench::Blackhole;
use crate::config::{BenchConfig, RuntimeFlags};
use crate::error::ConfigError;
use crate::fixture::{ListState, NumericState};
use crate::types::{Mode, OutputUnit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of a benchmark, bound to the fixture it runs against
#[derive(Debug, Clone, Copy)]
pub enum CaseBody {
    List(fn(&mut ListState, &mut Blackhole)),
    Numeric(fn(&mut NumericState, &mut Blackhole)),
}

/// Group of cases sharing modes, unit and preset configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suite {
    List,
    Wrappers,
}

impl Suite {
    pub const ALL: [Suite; 2] = [Suite::List, Suite::Wrappers];

    pub fn name(&self) -> &'static str {
        match self {
            Suite::List => "list",
            Suite::Wrappers => "wrappers",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn modes(&self) -> &'static [Mode] {
        match self {
            Suite::List => &[Mode::Throughput],
            Suite::Wrappers => &[Mode::Throughput, Mode::AverageTime],
        }
    }

    pub fn unit(&self) -> OutputUnit {
        match self {
            Suite::List => OutputUnit::Seconds,
            Suite::Wrappers => OutputUnit::Milliseconds,
        }
    }

    /// Settings the suite was tuned with
    pub fn preset(&self) -> BenchConfig {
        match self {
            Suite::List => BenchConfig {
                include: vec![self.name().to_string()],
                forks: 1,
                warmup_iterations: 3,
                measurement_iterations: 3,
                runtime: RuntimeFlags { box_cache_max: 200_002 },
                ..Default::default()
            },
            Suite::Wrappers => BenchConfig {
                include: vec![self.name().to_string()],
                forks: 1,
                warmup_iterations: 5,
                measurement_iterations: 5,
                ..Default::default()
            },
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A named benchmark
#[derive(Debug, Clone)]
pub struct BenchCase {
    pub name: &'static str,
    pub suite: Suite,
    pub modes: &'static [Mode],
    pub unit: OutputUnit,
    pub body: CaseBody,
}

impl BenchCase {
    pub fn new(name: &'static str, suite: Suite, body: CaseBody) -> Self {
        Self {
            name,
            suite,
            modes: suite.modes(),
            unit: suite.unit(),
            body,
        }
    }

    /// Modes to run under `config`
    pub fn modes_for(&self, config: &BenchConfig) -> Vec<Mode> {
        match config.mode {
            Some(mode) => vec![mode],
            None => self.modes.to_vec(),
        }
    }

    pub fn unit_for(&self, config: &BenchConfig) -> OutputUnit {
        config.output_unit.unwrap_or(self.unit)
    }
}

/// All runnable cases, in reporting order
#[derive(Debug, Clone, Default)]
pub struct Registry {
    cases: Vec<BenchCase>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding both suites
    pub fn builtin() -> Self {
        use CaseBody::{List, Numeric};

        let mut registry = Self::new();
        for (name, body) in [
            ("iterate-linked", List(list::iterate_linked)),
            ("iterate-array", List(list::iterate_array)),
            ("iterate-linked-by-index", List(list::iterate_linked_by_index)),
            ("iterate-array-by-index", List(list::iterate_array_by_index)),
            ("append-linked", List(list::append_linked)),
            ("append-array", List(list::append_array)),
            ("insert-linked-middle", List(list::insert_linked_middle)),
            ("insert-array-middle", List(list::insert_array_middle)),
        ] {
            registry.register(BenchCase::new(name, Suite::List, body));
        }
        registry.register(BenchCase::new(
            "primitive-numeric-loop",
            Suite::Wrappers,
            Numeric(wrappers::primitive_loop),
        ));
        registry.register(BenchCase::new(
            "boxed-numeric-loop",
            Suite::Wrappers,
            Numeric(wrappers::boxed_loop),
        ));
        registry
    }

    /// Add a case; a case with the same name is replaced
    pub fn register(&mut self, case: BenchCase) {
        match self.cases.iter_mut().find(|c| c.name == case.name) {
            Some(existing) => *existing = case,
            None => self.cases.push(case),
        }
    }

    pub fn get(&self, name: &str) -> Option<&BenchCase> {
        self.cases.iter().find(|c| c.name == name)
    }

    pub fn cases(&self) -> &[BenchCase] {
        &self.cases
    }

    /// Cases selected by `include` (case or suite names), in registry order.
    /// An empty selection means every case.
    pub fn resolve(&self, include: &[String]) -> Result<Vec<&BenchCase>, ConfigError> {
        if include.is_empty() {
            return Ok(self.cases.iter().collect());
        }

        for name in include {
            let known = self.get(name).is_some()
                || Suite::from_name(name).is_some_and(|s| self.cases.iter().any(|c| c.suite == s));
            if !known {
                return Err(ConfigError::UnknownCase(name.clone()));
            }
        }

        Ok(self
            .cases
            .iter()
            .filter(|c| include.iter().any(|n| n == c.name || n == c.suite.name()))
            .collect())
    }
}
