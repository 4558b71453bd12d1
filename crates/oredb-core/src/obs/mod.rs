//! Observability for index activity.
//!
//! Tree and oracle code emit [`sink::MetricsEvent`]s through [`sink::record`];
//! the default sink folds them into process-local counters readable via
//! [`metrics::snapshot`]. Nothing here is on any hot error path.

pub mod metrics;
pub mod sink;
