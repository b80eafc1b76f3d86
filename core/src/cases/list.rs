//! Linked list vs. array list bodies

use crate::bench::Blackhole;
use crate::fixture::{linked_get, midpoint, ListState, SIZE};

/// Elements inserted at the middle by the insert cases
pub const INSERTS: usize = 1_000;

pub fn iterate_linked(state: &mut ListState, bh: &mut Blackhole) {
    for i in &state.linked {
        bh.consume(i);
    }
}

pub fn iterate_array(state: &mut ListState, bh: &mut Blackhole) {
    for i in &state.array {
        bh.consume(i);
    }
}

pub fn append_linked(state: &mut ListState, bh: &mut Blackhole) {
    let cache = &state.cache;
    let list = &mut state.empty_linked;
    for i in 0..SIZE {
        list.push_back(cache.value_of(i as i32));
    }
    bh.consume(list);
}

pub fn append_array(state: &mut ListState, bh: &mut Blackhole) {
    let cache = &state.cache;
    let list = &mut state.empty_array;
    for i in 0..SIZE {
        list.push(cache.value_of(i as i32));
    }
    bh.consume(list);
}

pub fn insert_linked_middle(state: &mut ListState, bh: &mut Blackhole) {
    let cache = &state.cache;
    let list = &mut state.linked;
    for i in 0..INSERTS {
        let mid = midpoint(list.len());
        let mut tail = list.split_off(mid);
        list.push_back(cache.value_of(i as i32));
        list.append(&mut tail);
    }
    bh.consume(list);
}

pub fn insert_array_middle(state: &mut ListState, bh: &mut Blackhole) {
    let cache = &state.cache;
    let list = &mut state.array;
    for i in 0..INSERTS {
        let mid = midpoint(list.len());
        list.insert(mid, cache.value_of(i as i32));
    }
    bh.consume(list);
}

/// Only the 1K list: every lookup walks the nodes
pub fn iterate_linked_by_index(state: &mut ListState, bh: &mut Blackhole) {
    let list = &state.linked_1k;
    let size = list.len();
    for i in 0..size {
        bh.consume(linked_get(list, i));
    }
}

pub fn iterate_array_by_index(state: &mut ListState, bh: &mut Blackhole) {
    let list = &state.array;
    for i in 0..SIZE {
        bh.consume(list.get(i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeFlags;
    use crate::fixture::{BenchState, SMALL_SIZE};
    use std::rc::Rc;

    fn state() -> ListState {
        ListState::new(&RuntimeFlags::default())
    }

    #[test]
    fn test_iterate_consumes_every_element() {
        let mut state = state();
        let mut bh = Blackhole::new();

        iterate_linked(&mut state, &mut bh);
        assert_eq!(bh.consumed(), SIZE as u64);

        bh.reset();
        iterate_array(&mut state, &mut bh);
        assert_eq!(bh.consumed(), SIZE as u64);

        bh.reset();
        iterate_linked_by_index(&mut state, &mut bh);
        assert_eq!(bh.consumed(), SMALL_SIZE as u64);

        bh.reset();
        iterate_array_by_index(&mut state, &mut bh);
        assert_eq!(bh.consumed(), SIZE as u64);
    }

    #[test]
    fn test_append_fills_empty_lists() {
        let mut state = state();
        let mut bh = Blackhole::new();

        append_linked(&mut state, &mut bh);
        append_array(&mut state, &mut bh);

        assert_eq!(state.empty_linked.len(), SIZE);
        assert_eq!(state.empty_array.len(), SIZE);
        assert!(state.empty_linked.iter().enumerate().all(|(i, v)| **v == i as i32));
        assert!(state.empty_array.iter().enumerate().all(|(i, v)| **v == i as i32));
    }

    #[test]
    fn test_insert_middle_grows_by_inserts() {
        let mut state = state();
        let mut bh = Blackhole::new();

        insert_linked_middle(&mut state, &mut bh);
        insert_array_middle(&mut state, &mut bh);

        assert_eq!(state.linked.len(), SIZE + INSERTS);
        assert_eq!(state.array.len(), SIZE + INSERTS);
        assert!(state.linked.iter().eq(state.array.iter()));
    }

    #[test]
    fn test_inserted_boxes_come_from_cache() {
        let mut state = state();
        let mut bh = Blackhole::new();

        insert_array_middle(&mut state, &mut bh);

        // 999 lies above the default bound of 127, 0 does not.
        let inserted = &state.array[midpoint(SIZE)..midpoint(SIZE) + INSERTS];
        let high = inserted.iter().find(|v| ***v == 999).unwrap();
        let low = inserted.iter().find(|v| ***v == 0).unwrap();
        assert!(!Rc::ptr_eq(high, &state.cache.value_of(999)));
        assert!(Rc::ptr_eq(low, &state.cache.value_of(0)));
    }

    #[test]
    fn test_insert_lands_at_midpoint() {
        let mut state = state();
        state.array = [10, 20, 30].into_iter().map(Rc::new).collect();
        state.linked = state.array.iter().cloned().collect();
        let mut bh = Blackhole::new();

        insert_array_middle(&mut state, &mut bh);
        insert_linked_middle(&mut state, &mut bh);

        // First insert lands at index 1 of the 3-element list.
        assert_eq!(*state.array[1], 0);
        assert_eq!(state.array.len(), 3 + INSERTS);
        assert!(state.linked.iter().eq(state.array.iter()));
    }
}
