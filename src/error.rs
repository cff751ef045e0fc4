use thiserror::Error;

use crate::history::MetricField;

/// A snapshot was appended whose index does not directly follow the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("out-of-order iteration: expected index {expected}, got {found}")]
pub struct OutOfOrderError {
    pub expected: usize,
    pub found: usize,
}

/// Failure while turning a metric series into image bytes.
#[derive(Debug, Error)]
pub enum ChartRenderError {
    #[error("chart `{title}` has no data points to plot")]
    EmptySeries { title: String },
    #[error("chart dimensions {width}x{height} are too small to plot into")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("chart drawing failed: {0}")]
    Backend(String),
    #[error("chart encoding failed: {0}")]
    Encoding(String),
    #[error("chart artifact could not be written: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while handing a composed report to a transport.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid mail address `{address}`")]
    Address {
        address: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("message could not be assembled")]
    Build(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("transport rejected the message")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("outbox write failed")]
    Io(#[from] std::io::Error),
}

/// Failure loading notifier configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Every failure a `TrainingObserver` lifecycle call can surface.
#[derive(Debug, Error)]
pub enum ObserverError {
    #[error(transparent)]
    OutOfOrder(#[from] OutOfOrderError),
    #[error("a run needs at least one iteration")]
    ZeroIterations,
    #[error("iteration metrics are missing `{field}`")]
    MissingMetric { field: MetricField },
    #[error("`{operation}` is not allowed while the observer is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
    #[error("chart rendering failed")]
    ChartRender(#[from] ChartRenderError),
    #[error("report delivery failed")]
    Delivery(#[from] DeliveryError),
}
