//! Value sink for benchmark bodies

use std::hint::black_box;

/// Swallows values so the optimizer cannot drop the loop producing them.
///
/// Every value a benchmark body produces must go through [`Blackhole::consume`].
#[derive(Debug, Default)]
pub struct Blackhole {
    consumed: u64,
}

impl Blackhole {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn consume<T>(&mut self, value: T) {
        black_box(value);
        self.consumed = black_box(self.consumed.wrapping_add(1));
    }

    /// Values consumed so far
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn reset(&mut self) {
        self.consumed = 0;
    }
}
