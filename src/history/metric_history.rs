use crate::error::OutOfOrderError;
use crate::history::snapshot::{IterationSnapshot, MetricField};

/// Append-only record of every iteration seen in one run.
///
/// Indices must be contiguous starting at 0; `append` refuses anything else
/// so gaps and replays surface immediately instead of skewing the charts.
#[derive(Debug, Clone, Default)]
pub struct MetricHistory {
    snapshots: Vec<IterationSnapshot>,
}

impl MetricHistory {
    pub fn new() -> Self {
        MetricHistory { snapshots: Vec::new() }
    }

    /// Index the next appended snapshot must carry.
    pub fn next_index(&self) -> usize {
        self.snapshots.len()
    }

    /// Appends one snapshot. Fails unless `snapshot.index == self.len()`.
    pub fn append(&mut self, snapshot: IterationSnapshot) -> Result<(), OutOfOrderError> {
        let expected = self.next_index();
        if snapshot.index != expected {
            return Err(OutOfOrderError { expected, found: snapshot.index });
        }
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// The last `min(n, len)` snapshots in iteration order.
    pub fn tail(&self, n: usize) -> &[IterationSnapshot] {
        let start = self.snapshots.len().saturating_sub(n);
        &self.snapshots[start..]
    }

    /// Values of one metric across the whole history, oldest first.
    ///
    /// The returned iterator is `Clone`, so it can be walked more than once.
    /// It borrows the history, which therefore cannot grow while it is alive.
    pub fn series(&self, field: MetricField) -> impl Iterator<Item = f64> + Clone + '_ {
        self.snapshots.iter().map(move |s| s.value(field))
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn last(&self) -> Option<&IterationSnapshot> {
        self.snapshots.last()
    }

    pub fn as_slice(&self) -> &[IterationSnapshot] {
        &self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn snap(index: usize) -> IterationSnapshot {
        IterationSnapshot {
            index,
            loss: 1.0 / (index as f64 + 1.0),
            accuracy: index as f64 / 10.0,
            validation_loss: 1.5 / (index as f64 + 1.0),
            validation_accuracy: index as f64 / 12.0,
        }
    }

    fn filled(n: usize) -> MetricHistory {
        let mut history = MetricHistory::new();
        for i in 0..n {
            history.append(snap(i)).unwrap();
        }
        history
    }

    #[test]
    fn first_append_must_be_zero() {
        let mut history = MetricHistory::new();
        let err = history.append(snap(1)).unwrap_err();
        assert_eq!(err, OutOfOrderError { expected: 0, found: 1 });
        assert!(history.is_empty());
    }

    #[test]
    fn skipped_index_is_rejected() {
        let mut history = filled(3);
        let err = history.append(snap(4)).unwrap_err();
        assert_eq!(err, OutOfOrderError { expected: 3, found: 4 });
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn repeated_index_is_rejected() {
        let mut history = filled(2);
        assert!(history.append(snap(1)).is_err());
    }

    #[test]
    fn tail_clamps_to_length_and_keeps_order() {
        let history = filled(5);
        let indices: Vec<usize> = history.tail(3).iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![2, 3, 4]);
        assert_eq!(history.tail(10).len(), 5);
        assert!(history.tail(0).is_empty());
        assert!(MetricHistory::new().tail(3).is_empty());
    }

    #[test]
    fn series_is_restartable() {
        let history = filled(4);
        let series = history.series(MetricField::Accuracy);
        let first: Vec<f64> = series.clone().collect();
        let second: Vec<f64> = series.collect();
        assert_eq!(first, vec![0.0, 0.1, 0.2, 0.3]);
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn length_tracks_contiguous_appends(n in 0usize..200) {
            let history = filled(n);
            prop_assert_eq!(history.len(), n);
            prop_assert_eq!(history.series(MetricField::Loss).count(), n);
        }

        #[test]
        fn tail_never_exceeds_request(n in 0usize..50, k in 0usize..60) {
            let history = filled(n);
            prop_assert_eq!(history.tail(k).len(), k.min(n));
        }
    }
}
