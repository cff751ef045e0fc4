pub mod snapshot;
pub mod metric_history;

pub use snapshot::{IterationSnapshot, MetricField, UnknownMetricField};
pub use metric_history::MetricHistory;
