//! Fixture state handed to benchmark bodies
//!
//! A fixture is built once when a fork starts. States at [`Level::Invocation`]
//! are additionally set up before and torn down after every invocation, so
//! that no invocation observes a container mutated by a previous one.

mod list;
mod numeric;

pub use list::{linked_get, midpoint, populate_array, populate_linked, ListState, SIZE, SMALL_SIZE};
pub use numeric::{BoxCache, BoxedInt, NumericState, BOX_CACHE_LOW, LOOP_LIMIT};

use crate::config::RuntimeFlags;
use crate::types::Level;

/// Lifecycle of a fixture
pub trait BenchState: Sized {
    /// How often `setup` and `tear_down` run
    const LEVEL: Level;

    /// Build a ready-to-use fixture
    fn new(flags: &RuntimeFlags) -> Self;

    /// Rebuild every container from scratch
    fn setup(&mut self);

    fn tear_down(&mut self);
}
