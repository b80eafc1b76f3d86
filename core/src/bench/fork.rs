//! Fork launchers
//!
//! Each fork runs the whole warmup + measurement cycle of one case in one
//! mode. [`ProcessLauncher`] re-executes the harness binary so every fork gets
//! a fresh process; [`InProcessLauncher`] runs the fork on the calling thread.

use super::runner::run_fork;
use crate::cases::{BenchCase, Registry};
use crate::config::LoggingConfig;
use crate::error::{BenchError, ConfigError};
use crate::types::{ForkOutcome, ForkPlan, ForkRecord};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Hidden subcommand a forked child is started with
pub const FORK_CHILD_COMMAND: &str = "fork-child";

pub trait ForkLauncher {
    fn launch(&self, case: &BenchCase, plan: &ForkPlan) -> Result<ForkRecord, BenchError>;
}

/// Runs forks inside the current process
#[derive(Debug, Default, Clone, Copy)]
pub struct InProcessLauncher;

impl ForkLauncher for InProcessLauncher {
    fn launch(&self, case: &BenchCase, plan: &ForkPlan) -> Result<ForkRecord, BenchError> {
        run_fork(case, plan)
    }
}

/// Runs every fork in a child process of `program`
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    program: PathBuf,
    logging: LoggingConfig,
}

impl ProcessLauncher {
    pub fn new(program: impl Into<PathBuf>, logging: LoggingConfig) -> Self {
        Self {
            program: program.into(),
            logging,
        }
    }

    /// Launcher re-executing the running binary
    pub fn current_exe(logging: LoggingConfig) -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_exe()?, logging))
    }
}

impl ForkLauncher for ProcessLauncher {
    fn launch(&self, case: &BenchCase, plan: &ForkPlan) -> Result<ForkRecord, BenchError> {
        let plan_json = serde_json::to_string(plan).map_err(|source| BenchError::Protocol {
            case: case.name.to_string(),
            fork: plan.fork_index,
            source,
        })?;

        let mut cmd = Command::new(&self.program);
        cmd.arg(FORK_CHILD_COMMAND)
            .arg("--plan")
            .arg(&plan_json)
            .arg("--log-level")
            .arg(&self.logging.level);
        if self.logging.json_output {
            cmd.arg("--log-json");
        }

        debug!(program = %self.program.display(), fork = plan.fork_index, "Spawning fork");

        let output = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| BenchError::Spawn {
                case: case.name.to_string(),
                fork: plan.fork_index,
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let last_line = stdout.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("");

        match serde_json::from_str::<ForkOutcome>(last_line) {
            Ok(ForkOutcome::Completed(record)) => Ok(record),
            Ok(ForkOutcome::Failed { fork_index, reason }) => Err(BenchError::ChildFailed {
                case: case.name.to_string(),
                fork: fork_index,
                reason,
            }),
            Err(_) if !output.status.success() => Err(BenchError::ChildExited {
                case: case.name.to_string(),
                fork: plan.fork_index,
                status: output.status.to_string(),
            }),
            Err(source) => Err(BenchError::Protocol {
                case: case.name.to_string(),
                fork: plan.fork_index,
                source,
            }),
        }
    }
}

/// Body of a forked child: run the planned fork and describe how it went
pub fn run_child(registry: &Registry, plan: &ForkPlan) -> ForkOutcome {
    let result = registry
        .get(&plan.case)
        .ok_or_else(|| BenchError::from(ConfigError::UnknownCase(plan.case.clone())))
        .and_then(|case| run_fork(case, plan));

    match result {
        Ok(record) => ForkOutcome::Completed(record),
        Err(e) => {
            warn!("{}", e);
            ForkOutcome::Failed {
                fork_index: plan.fork_index,
                reason: e.to_string(),
            }
        }
    }
}
