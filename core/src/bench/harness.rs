//! Drives every selected case through its forks

use super::fork::ForkLauncher;
use super::report::{CaseReport, RunReport};
use crate::cases::Registry;
use crate::config::BenchConfig;
use crate::error::ConfigError;
use crate::types::ForkPlan;
use tracing::{error, info};

pub struct Harness<L> {
    registry: Registry,
    launcher: L,
}

impl<L: ForkLauncher> Harness<L> {
    pub fn new(registry: Registry, launcher: L) -> Self {
        Self { registry, launcher }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run every case `config` selects.
    ///
    /// Configuration problems are returned before any fork starts. Failed
    /// forks do not stop the run; they are recorded in the report.
    pub fn run(&self, config: &BenchConfig) -> Result<RunReport, ConfigError> {
        config.validate()?;
        let cases = self.registry.resolve(&config.include)?;

        info!(
            cases = cases.len(),
            forks = config.fork_runs(),
            warmup = config.warmup_iterations,
            measurement = config.measurement_iterations,
            "Running benchmarks"
        );

        let mut reports = Vec::new();
        for case in cases {
            let unit = case.unit_for(config);
            for mode in case.modes_for(config) {
                let mut forks = Vec::with_capacity(config.fork_runs() as usize);
                for fork_index in 0..config.fork_runs() {
                    let plan = ForkPlan {
                        case: case.name.to_string(),
                        mode,
                        unit,
                        fork_index,
                        warmup_iterations: config.warmup_iterations,
                        measurement_iterations: config.measurement_iterations,
                        iteration_time_ms: config.iteration_time_ms,
                        runtime: config.runtime.clone(),
                    };

                    let result = self.launcher.launch(case, &plan);
                    if let Err(e) = &result {
                        error!(case = case.name, fork = fork_index, "Fork failed: {}", e);
                    }
                    forks.push(result);
                }

                let report = CaseReport::from_forks(case.name, case.suite, mode, unit, forks);
                info!("{}", report);
                reports.push(report);
            }
        }

        Ok(RunReport {
            forks: config.fork_runs(),
            warmup_iterations: config.warmup_iterations,
            measurement_iterations: config.measurement_iterations,
            cpus: num_cpus::get(),
            cases: reports,
        })
    }
}
