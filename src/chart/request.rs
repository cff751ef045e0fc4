use crate::history::{MetricField, MetricHistory};

/// The two trend charts attached to every report that carries charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Accuracy,
    Loss,
}

impl ChartKind {
    pub const ALL: [ChartKind; 2] = [ChartKind::Accuracy, ChartKind::Loss];

    /// Identifier the report body uses (`cid:<id>`) and the notifier binds
    /// the image bytes to.
    pub fn placeholder(self) -> &'static str {
        match self {
            ChartKind::Accuracy => "accuracy",
            ChartKind::Loss     => "loss",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Accuracy => "Training Accuracy",
            ChartKind::Loss     => "Training Loss",
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            ChartKind::Accuracy => "Accuracy",
            ChartKind::Loss     => "Loss",
        }
    }

    /// Training and validation metric plotted on this chart.
    pub fn fields(self) -> [(MetricField, &'static str); 2] {
        match self {
            ChartKind::Accuracy => [
                (MetricField::Accuracy, "train_acc"),
                (MetricField::ValidationAccuracy, "val_acc"),
            ],
            ChartKind::Loss => [
                (MetricField::Loss, "train_loss"),
                (MetricField::ValidationLoss, "val_loss"),
            ],
        }
    }
}

/// One labelled line on a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    pub label: String,
    pub values: Vec<f64>,
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Up to four series, all indexed by iteration.
    pub series: Vec<NamedSeries>,
}

impl ChartRequest {
    /// Builds the request for `kind` from the full history.
    pub fn from_history(kind: ChartKind, history: &MetricHistory) -> Self {
        let series = kind
            .fields()
            .into_iter()
            .map(|(field, label)| NamedSeries {
                label: label.to_owned(),
                values: history.series(field).collect(),
            })
            .collect();
        ChartRequest {
            title: kind.title().to_owned(),
            x_label: "Iteration #".to_owned(),
            y_label: kind.y_label().to_owned(),
            series,
        }
    }

    /// Longest series length; the x axis spans `0..point_count()`.
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.values.len()).max().unwrap_or(0)
    }

    /// `(min, max)` over all finite values, or `None` if there are none.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None             => Some((v, v)),
                Some((lo, hi))   => Some((lo.min(v), hi.max(v))),
            })
    }
}
