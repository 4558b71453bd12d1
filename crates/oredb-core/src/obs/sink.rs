//! Metrics sink boundary.
//!
//! Tree and oracle logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between index logic and the
//! process-local metrics state.

use crate::obs::metrics;
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = const { RefCell::new(None) };
}

///
/// RotationDirection
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RotationDirection {
    Left,
    Right,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent {
    /// One point-read against the node store, hit or miss.
    StoreRead,
    /// One point-write (partial field merge) against the node store.
    StoreWrite,
    /// One oracle comparison that produced a verdict.
    OracleCompare,
    /// One completed single rotation.
    Rotation { direction: RotationDirection },
    /// One node visited by a search walker.
    SearchStep,
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default process-local sink that writes into the global counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| match event {
            MetricsEvent::StoreRead => m.store_reads = m.store_reads.saturating_add(1),
            MetricsEvent::StoreWrite => m.store_writes = m.store_writes.saturating_add(1),
            MetricsEvent::OracleCompare => {
                m.oracle_comparisons = m.oracle_comparisons.saturating_add(1);
            }
            MetricsEvent::Rotation {
                direction: RotationDirection::Left,
            } => m.rotations_left = m.rotations_left.saturating_add(1),
            MetricsEvent::Rotation {
                direction: RotationDirection::Right,
            } => m.rotations_right = m.rotations_right.saturating_add(1),
            MetricsEvent::SearchStep => m.search_steps = m.search_steps.saturating_add(1),
        });
    }
}

/// Route one event to the scoped sink, or to the global counters when no
/// override is installed.
pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` was produced from a valid `&dyn MetricsSink` in `with_sink`.
        // - `with_sink` always restores the previous pointer before
        //   returning, including unwind paths via `Guard::drop`.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        unsafe { (&*ptr).record(event) };
    } else {
        GlobalMetricsSink.record(event);
    }
}

/// Run `f` with every event routed to `sink` instead of the global state.
/// Intended for tests that assert on exact event flows.
pub fn with_sink<R>(sink: &dyn MetricsSink, f: impl FnOnce() -> R) -> R {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - `sink_ptr` is installed only for this dynamic scope; `Guard`
    //   restores the previous slot on all exits, including panic.
    // - `record` only dereferences synchronously and never persists it.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
