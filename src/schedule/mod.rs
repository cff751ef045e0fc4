pub mod trigger;
pub mod scheduler;
pub mod estimator;

pub use trigger::ReportTrigger;
pub use scheduler::{ProgressScheduler, CHECKPOINT_PERCENTAGES};
pub use estimator::{DurationEstimator, RemainingTime};
