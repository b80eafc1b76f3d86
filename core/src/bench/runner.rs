//! Warmup and measurement loop of a single fork

use super::Blackhole;
use crate::cases::{BenchCase, CaseBody};
use crate::error::BenchError;
use crate::fixture::BenchState;
use crate::types::{ForkPlan, ForkRecord, IterationResult, Level};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Run one fork of `case` as described by `plan`.
///
/// A panic inside the case body aborts the fork and comes back as
/// [`BenchError::BodyPanicked`].
pub fn run_fork(case: &BenchCase, plan: &ForkPlan) -> Result<ForkRecord, BenchError> {
    info!(
        case = case.name,
        mode = %plan.mode,
        fork = plan.fork_index,
        "Starting fork"
    );

    let result = panic::catch_unwind(AssertUnwindSafe(|| match case.body {
        CaseBody::List(body) => run_with_state(plan, body),
        CaseBody::Numeric(body) => run_with_state(plan, body),
    }));

    result.map_err(|payload| BenchError::BodyPanicked {
        case: case.name.to_string(),
        fork: plan.fork_index,
        message: panic_message(payload.as_ref()),
    })
}

fn run_with_state<S: BenchState>(plan: &ForkPlan, body: fn(&mut S, &mut Blackhole)) -> ForkRecord {
    let mut state = S::new(&plan.runtime);
    let mut bh = Blackhole::new();
    let budget = plan.iteration_time();

    let mut warmup = Vec::with_capacity(plan.warmup_iterations as usize);
    for n in 1..=plan.warmup_iterations {
        let it = run_iteration(&mut state, body, &mut bh, budget);
        debug!(
            "# Warmup Iteration {:>3}: {:.3} {}",
            n,
            it.score(plan.mode, plan.unit),
            plan.unit.score_label(plan.mode)
        );
        warmup.push(it);
    }

    let mut measurement = Vec::with_capacity(plan.measurement_iterations as usize);
    for n in 1..=plan.measurement_iterations {
        let it = run_iteration(&mut state, body, &mut bh, budget);
        info!(
            "Iteration {:>3}: {:.3} {} ({} ops)",
            n,
            it.score(plan.mode, plan.unit),
            plan.unit.score_label(plan.mode),
            it.operations
        );
        measurement.push(it);
    }

    if S::LEVEL == Level::Trial {
        state.tear_down();
    }

    ForkRecord {
        case: plan.case.clone(),
        mode: plan.mode,
        fork_index: plan.fork_index,
        warmup,
        measurement,
    }
}

/// Invoke `body` until `budget` of wall-clock time has passed, at least once.
///
/// Only the body itself is timed. Invocation-level fixtures are set up right
/// before and torn down right after each invocation.
pub fn run_iteration<S: BenchState>(
    state: &mut S,
    body: fn(&mut S, &mut Blackhole),
    bh: &mut Blackhole,
    budget: Duration,
) -> IterationResult {
    let started = Instant::now();
    let mut operations = 0u64;
    let mut elapsed = Duration::ZERO;

    loop {
        if S::LEVEL == Level::Invocation {
            state.setup();
        }

        let start = Instant::now();
        body(state, bh);
        elapsed += start.elapsed();
        operations += 1;

        if S::LEVEL == Level::Invocation {
            state.tear_down();
        }

        if started.elapsed() >= budget {
            break;
        }
    }

    IterationResult {
        operations,
        elapsed_ns: elapsed.as_nanos() as u64,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::Suite;
    use crate::config::RuntimeFlags;
    use crate::types::{Mode, OutputUnit};

    /// Counts lifecycle calls and fails if it ever sees a mutated fixture
    #[derive(Default)]
    struct Probe {
        setups: u32,
        tear_downs: u32,
        dirty: bool,
    }

    impl BenchState for Probe {
        const LEVEL: Level = Level::Invocation;

        fn new(_flags: &RuntimeFlags) -> Self {
            Self::default()
        }

        fn setup(&mut self) {
            self.setups += 1;
            self.dirty = false;
        }

        fn tear_down(&mut self) {
            self.tear_downs += 1;
            self.dirty = false;
        }
    }

    fn mutate(state: &mut Probe, bh: &mut Blackhole) {
        assert!(!state.dirty, "invocation saw a mutated fixture");
        state.dirty = true;
        bh.consume(state.setups);
    }

    fn plan(case: &str) -> ForkPlan {
        ForkPlan {
            case: case.to_string(),
            mode: Mode::Throughput,
            unit: OutputUnit::Seconds,
            fork_index: 0,
            warmup_iterations: 2,
            measurement_iterations: 3,
            iteration_time_ms: 0,
            runtime: RuntimeFlags::default(),
        }
    }

    #[test]
    fn test_zero_budget_runs_once() {
        let mut state = Probe::new(&RuntimeFlags::default());
        let mut bh = Blackhole::new();

        let it = run_iteration(&mut state, mutate, &mut bh, Duration::ZERO);

        assert_eq!(it.operations, 1);
        assert_eq!(state.setups, 1);
        assert_eq!(state.tear_downs, 1);
        assert_eq!(bh.consumed(), 1);
    }

    #[test]
    fn test_every_invocation_is_isolated() {
        let mut state = Probe::new(&RuntimeFlags::default());
        let mut bh = Blackhole::new();

        let it = run_iteration(&mut state, mutate, &mut bh, Duration::from_millis(5));

        assert!(it.operations >= 1);
        assert_eq!(state.setups as u64, it.operations);
        assert_eq!(state.tear_downs as u64, it.operations);
    }

    fn noop(_state: &mut crate::fixture::NumericState, bh: &mut Blackhole) {
        bh.consume(0);
    }

    fn explode(_state: &mut crate::fixture::NumericState, _bh: &mut Blackhole) {
        panic!("fixture exploded");
    }

    #[test]
    fn test_fork_collects_all_iterations() {
        let case = BenchCase::new("noop", Suite::Wrappers, CaseBody::Numeric(noop));

        let record = run_fork(&case, &plan("noop")).unwrap();

        assert_eq!(record.case, "noop");
        assert_eq!(record.warmup.len(), 2);
        assert_eq!(record.measurement.len(), 3);
        assert!(record.measurement.iter().all(|it| it.operations == 1));
    }

    #[test]
    fn test_panicking_body_is_reported() {
        let case = BenchCase::new("explode", Suite::Wrappers, CaseBody::Numeric(explode));
        let mut plan = plan("explode");
        plan.fork_index = 4;

        let err = run_fork(&case, &plan).unwrap_err();

        match err {
            BenchError::BodyPanicked { case, fork, message } => {
                assert_eq!(case, "explode");
                assert_eq!(fork, 4);
                assert_eq!(message, "fixture exploded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
