pub mod run_config;
pub mod iteration_metrics;
pub mod observer;

pub use run_config::{ObserverOptions, RunConfig};
pub use iteration_metrics::IterationMetrics;
pub use observer::{ObserverState, TrainingObserver};
