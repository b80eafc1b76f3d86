//! Linked list and array list fixtures

use super::numeric::{BoxCache, BoxedInt};
use super::BenchState;
use crate::config::RuntimeFlags;
use crate::types::Level;
use std::collections::LinkedList;

/// Elements in the large containers
pub const SIZE: usize = 1_000_000;

/// Elements in the linked list walked by index
pub const SMALL_SIZE: usize = 1_000;

/// Containers used by the list suite, rebuilt around every invocation.
///
/// Elements are boxed integers taken from `cache`, which is sized by
/// `box_cache_max` once per fork and survives every rebuild.
#[derive(Debug, Clone, Default)]
pub struct ListState {
    pub cache: BoxCache,
    pub linked: LinkedList<BoxedInt>,
    pub linked_1k: LinkedList<BoxedInt>,
    pub array: Vec<BoxedInt>,
    pub empty_linked: LinkedList<BoxedInt>,
    pub empty_array: Vec<BoxedInt>,
}

impl BenchState for ListState {
    const LEVEL: Level = Level::Invocation;

    fn new(flags: &RuntimeFlags) -> Self {
        let mut state = Self {
            cache: BoxCache::new(flags.box_cache_max),
            ..Default::default()
        };
        state.setup();
        state
    }

    fn setup(&mut self) {
        self.linked = populate_linked(SIZE, &self.cache);
        self.array = populate_array(SIZE, &self.cache);
        self.linked_1k = populate_linked(SMALL_SIZE, &self.cache);
        self.empty_linked = LinkedList::new();
        self.empty_array = Vec::new();
    }

    fn tear_down(&mut self) {
        // Leave a pristine fixture behind for the next invocation.
        self.setup();
    }
}

/// Linked list holding `0..len` in order
pub fn populate_linked(len: usize, cache: &BoxCache) -> LinkedList<BoxedInt> {
    let mut list = LinkedList::new();
    for i in 0..len {
        list.push_back(cache.value_of(i as i32));
    }
    list
}

/// Array list holding `0..len` in order, grown one push at a time
pub fn populate_array(len: usize, cache: &BoxCache) -> Vec<BoxedInt> {
    let mut list = Vec::new();
    for i in 0..len {
        list.push(cache.value_of(i as i32));
    }
    list
}

/// Middle position of a list of `len` elements (unsigned shift, never negative)
#[inline(always)]
pub fn midpoint(len: usize) -> usize {
    len >> 1
}

/// Element at `index`, walking from whichever end of the list is closer
pub fn linked_get(list: &LinkedList<BoxedInt>, index: usize) -> Option<&BoxedInt> {
    let len = list.len();
    if index >= len {
        return None;
    }
    if index < (len >> 1) {
        list.iter().nth(index)
    } else {
        list.iter().rev().nth(len - 1 - index)
    }
}
