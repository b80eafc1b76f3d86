//! Primitive vs. boxed integer loop bodies

use crate::bench::Blackhole;
use crate::fixture::{NumericState, LOOP_LIMIT};

pub fn primitive_loop(_state: &mut NumericState, bh: &mut Blackhole) {
    for i in 0..LOOP_LIMIT {
        bh.consume(i);
    }
}

/// Every increment unboxes the counter and boxes the successor
pub fn boxed_loop(state: &mut NumericState, bh: &mut Blackhole) {
    let cache = &state.cache;
    let mut i = cache.value_of(0);
    while *i < LOOP_LIMIT {
        bh.consume(&i);
        i = cache.value_of(*i + 1);
    }
}
