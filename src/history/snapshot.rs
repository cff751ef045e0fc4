use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Metrics recorded at the end of one training iteration.
///
/// Column order in reports follows the field order here:
/// `index`, `loss`, `accuracy`, `validation_loss`, `validation_accuracy`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationSnapshot {
    /// 0-based iteration number.
    pub index: usize,
    pub loss: f64,
    pub accuracy: f64,
    pub validation_loss: f64,
    pub validation_accuracy: f64,
}

impl IterationSnapshot {
    /// Reads one float metric by name.
    pub fn value(&self, field: MetricField) -> f64 {
        match field {
            MetricField::Loss               => self.loss,
            MetricField::Accuracy           => self.accuracy,
            MetricField::ValidationLoss     => self.validation_loss,
            MetricField::ValidationAccuracy => self.validation_accuracy,
        }
    }
}

/// The float-valued columns of an `IterationSnapshot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    Loss,
    Accuracy,
    ValidationLoss,
    ValidationAccuracy,
}

impl MetricField {
    /// All metric columns in report order.
    pub const ALL: [MetricField; 4] = [
        MetricField::Loss,
        MetricField::Accuracy,
        MetricField::ValidationLoss,
        MetricField::ValidationAccuracy,
    ];

    /// Column name as it appears in report tables.
    pub fn name(self) -> &'static str {
        match self {
            MetricField::Loss               => "loss",
            MetricField::Accuracy           => "accuracy",
            MetricField::ValidationLoss     => "validation_loss",
            MetricField::ValidationAccuracy => "validation_accuracy",
        }
    }

    /// Key under which training callbacks usually report this metric.
    pub fn log_key(self) -> &'static str {
        match self {
            MetricField::Loss               => "loss",
            MetricField::Accuracy           => "accuracy",
            MetricField::ValidationLoss     => "val_loss",
            MetricField::ValidationAccuracy => "val_accuracy",
        }
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown metric name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric field `{0}`")]
pub struct UnknownMetricField(pub String);

impl FromStr for MetricField {
    type Err = UnknownMetricField;

    /// Accepts both the column name and the short log key (`val_loss`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricField::ALL
            .into_iter()
            .find(|f| f.name() == s || f.log_key() == s)
            .ok_or_else(|| UnknownMetricField(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_column_names_and_log_keys() {
        assert_eq!("validation_loss".parse::<MetricField>(), Ok(MetricField::ValidationLoss));
        assert_eq!("val_accuracy".parse::<MetricField>(), Ok(MetricField::ValidationAccuracy));
        assert_eq!("loss".parse::<MetricField>(), Ok(MetricField::Loss));
        assert!("lr".parse::<MetricField>().is_err());
    }

    #[test]
    fn value_reads_matching_column() {
        let snap = IterationSnapshot {
            index: 3,
            loss: 0.4,
            accuracy: 0.8,
            validation_loss: 0.5,
            validation_accuracy: 0.7,
        };
        let values: Vec<f64> = MetricField::ALL.iter().map(|f| snap.value(*f)).collect();
        assert_eq!(values, vec![0.4, 0.8, 0.5, 0.7]);
    }
}
