//! Process-local counters for store traffic, oracle work, and tree fixes.

use std::cell::RefCell;

thread_local! {
    static STATE: RefCell<MetricsSnapshot> = const { RefCell::new(MetricsSnapshot::new()) };
}

///
/// MetricsSnapshot
///
/// Point-in-time copy of every counter. Store traffic and oracle work are
/// the cost drivers here, so they are counted rather than logged from inside
/// the hot loops.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MetricsSnapshot {
    pub store_reads: u64,
    pub store_writes: u64,
    pub oracle_comparisons: u64,
    pub rotations_left: u64,
    pub rotations_right: u64,
    pub search_steps: u64,
}

impl MetricsSnapshot {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            store_reads: 0,
            store_writes: 0,
            oracle_comparisons: 0,
            rotations_left: 0,
            rotations_right: 0,
            search_steps: 0,
        }
    }
}

/// Copy the current counters.
#[must_use]
pub fn snapshot() -> MetricsSnapshot {
    STATE.with(|state| *state.borrow())
}

/// Zero every counter.
pub fn reset() {
    STATE.with(|state| *state.borrow_mut() = MetricsSnapshot::new());
}

pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut MetricsSnapshot) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

///
/// TESTS
///
