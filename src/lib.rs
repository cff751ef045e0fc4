pub mod error;
pub mod history;
pub mod schedule;
pub mod report;
pub mod chart;
pub mod notify;
pub mod observe;

// Convenience re-exports
pub use error::{ChartRenderError, ConfigError, DeliveryError, ObserverError, OutOfOrderError};
pub use history::{IterationSnapshot, MetricField, MetricHistory};
pub use schedule::{DurationEstimator, ProgressScheduler, RemainingTime, ReportTrigger};
pub use report::{Report, ReportComposer};
pub use chart::{ChartKind, ChartRenderer, ChartRequest, PngChartRenderer, SvgChartRenderer};
pub use notify::{InlineImage, MailConfig, Notifier, OutboxNotifier, OutgoingMessage};
#[cfg(feature = "smtp")]
pub use notify::SmtpNotifier;
pub use observe::{IterationMetrics, ObserverOptions, ObserverState, RunConfig, TrainingObserver};
