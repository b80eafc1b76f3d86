//! Boxed integer fixture

use super::BenchState;
use crate::config::RuntimeFlags;
use crate::types::Level;
use std::rc::Rc;

/// Counter bound of both numeric loops
pub const LOOP_LIMIT: i32 = 100_000;

/// Lowest value kept in the box cache
pub const BOX_CACHE_LOW: i32 = -128;

/// A heap-allocated integer
pub type BoxedInt = Rc<i32>;

/// Shared boxes for small integers.
///
/// Values in `[BOX_CACHE_LOW, high]` are allocated once and handed out as
/// clones of the same box; anything else gets a fresh allocation per request.
#[derive(Debug, Clone)]
pub struct BoxCache {
    high: i32,
    cache: Vec<BoxedInt>,
}

impl Default for BoxCache {
    /// A cache holding nothing; every value gets its own box
    fn default() -> Self {
        Self {
            high: BOX_CACHE_LOW - 1,
            cache: Vec::new(),
        }
    }
}

impl BoxCache {
    pub fn new(high: i32) -> Self {
        let high = high.max(BOX_CACHE_LOW);
        Self {
            high,
            cache: (BOX_CACHE_LOW..=high).map(Rc::new).collect(),
        }
    }

    /// Box `value`, reusing the cached box when there is one
    #[inline]
    pub fn value_of(&self, value: i32) -> BoxedInt {
        if (BOX_CACHE_LOW..=self.high).contains(&value) {
            Rc::clone(&self.cache[(value - BOX_CACHE_LOW) as usize])
        } else {
            Rc::new(value)
        }
    }

    pub fn high(&self) -> i32 {
        self.high
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// State of the wrapper suite; never mutated by a case body
#[derive(Debug, Clone)]
pub struct NumericState {
    pub cache: BoxCache,
    box_cache_max: i32,
}

impl BenchState for NumericState {
    const LEVEL: Level = Level::Trial;

    fn new(flags: &RuntimeFlags) -> Self {
        let mut state = Self {
            cache: BoxCache::default(),
            box_cache_max: flags.box_cache_max,
        };
        state.setup();
        state
    }

    fn setup(&mut self) {
        self.cache = BoxCache::new(self.box_cache_max);
    }

    fn tear_down(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_values_share_allocation() {
        let cache = BoxCache::new(127);
        let a = cache.value_of(100);
        let b = cache.value_of(100);
        assert!(Rc::ptr_eq(&a, &b));
        assert!(Rc::ptr_eq(&cache.value_of(-128), &cache.value_of(-128)));
    }

    #[test]
    fn test_uncached_values_allocate() {
        let cache = BoxCache::new(127);
        let a = cache.value_of(128);
        let b = cache.value_of(128);
        assert_eq!(a, b);
        assert!(!Rc::ptr_eq(&a, &b));
        assert!(!Rc::ptr_eq(&cache.value_of(-129), &cache.value_of(-129)));
    }

    #[test]
    fn test_empty_cache_always_allocates() {
        let cache = BoxCache::default();
        assert!(cache.is_empty());
        assert!(!Rc::ptr_eq(&cache.value_of(0), &cache.value_of(0)));
    }

    #[test]
    fn test_cache_size_follows_flag() {
        let state = NumericState::new(&RuntimeFlags { box_cache_max: 200_002 });
        assert_eq!(state.cache.high(), 200_002);
        assert_eq!(state.cache.len(), 200_002 + 128 + 1);
        assert!(Rc::ptr_eq(&state.cache.value_of(LOOP_LIMIT), &state.cache.value_of(LOOP_LIMIT)));
    }
}
