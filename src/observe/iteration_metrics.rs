use std::collections::HashMap;

use crate::error::ObserverError;
use crate::history::{IterationSnapshot, MetricField};

/// Metrics reported by the training loop at the end of an iteration.
///
/// Every field is required; a `None` surfaces as `MissingMetric` when the
/// observer turns it into a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IterationMetrics {
    pub loss: Option<f64>,
    pub accuracy: Option<f64>,
    pub val_loss: Option<f64>,
    pub val_accuracy: Option<f64>,
}

impl IterationMetrics {
    /// All four metrics present.
    pub fn new(loss: f64, accuracy: f64, val_loss: f64, val_accuracy: f64) -> Self {
        IterationMetrics {
            loss: Some(loss),
            accuracy: Some(accuracy),
            val_loss: Some(val_loss),
            val_accuracy: Some(val_accuracy),
        }
    }

    /// Picks the metrics out of a callback-style log map keyed by
    /// `loss`, `accuracy`, `val_loss` and `val_accuracy`. Other keys are ignored.
    pub fn from_logs(logs: &HashMap<String, f64>) -> Self {
        let get = |field: MetricField| logs.get(field.log_key()).copied();
        IterationMetrics {
            loss: get(MetricField::Loss),
            accuracy: get(MetricField::Accuracy),
            val_loss: get(MetricField::ValidationLoss),
            val_accuracy: get(MetricField::ValidationAccuracy),
        }
    }

    fn get(&self, field: MetricField) -> Option<f64> {
        match field {
            MetricField::Loss               => self.loss,
            MetricField::Accuracy           => self.accuracy,
            MetricField::ValidationLoss     => self.val_loss,
            MetricField::ValidationAccuracy => self.val_accuracy,
        }
    }

    /// The first absent field in column order, if any.
    pub fn missing(&self) -> Option<MetricField> {
        MetricField::ALL.into_iter().find(|f| self.get(*f).is_none())
    }

    pub fn to_snapshot(&self, index: usize) -> Result<IterationSnapshot, ObserverError> {
        match (self.loss, self.accuracy, self.val_loss, self.val_accuracy) {
            (Some(loss), Some(accuracy), Some(validation_loss), Some(validation_accuracy)) => {
                Ok(IterationSnapshot { index, loss, accuracy, validation_loss, validation_accuracy })
            }
            _ => Err(ObserverError::MissingMetric {
                field: self.missing().unwrap_or(MetricField::Loss),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_metrics_become_snapshot() {
        let snap = IterationMetrics::new(0.5, 0.8, 0.6, 0.75).to_snapshot(7).unwrap();
        assert_eq!(snap.index, 7);
        assert_eq!(snap.validation_accuracy, 0.75);
    }

    #[test]
    fn reports_first_missing_field() {
        let metrics = IterationMetrics { val_loss: None, ..IterationMetrics::new(1.0, 0.1, 1.0, 0.1) };
        match metrics.to_snapshot(0) {
            Err(ObserverError::MissingMetric { field }) => assert_eq!(field, MetricField::ValidationLoss),
            other => panic!("expected MissingMetric, got {other:?}"),
        }
    }

    #[test]
    fn reads_callback_logs() {
        let logs: HashMap<String, f64> = [
            ("loss", 0.9),
            ("accuracy", 0.4),
            ("val_loss", 1.1),
            ("val_accuracy", 0.35),
            ("lr", 0.001),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        assert_eq!(IterationMetrics::from_logs(&logs), IterationMetrics::new(0.9, 0.4, 1.1, 0.35));
    }

    #[test]
    fn logs_without_validation_are_incomplete() {
        let logs: HashMap<String, f64> =
            [("loss".to_string(), 0.9), ("accuracy".to_string(), 0.4)].into_iter().collect();
        assert_eq!(IterationMetrics::from_logs(&logs).missing(), Some(MetricField::ValidationLoss));
    }
}
