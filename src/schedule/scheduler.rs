use crate::schedule::trigger::ReportTrigger;

/// Percentages at which an interim report is sent.
pub const CHECKPOINT_PERCENTAGES: [u8; 3] = [25, 50, 75];

/// Decides whether the iteration that just ended warrants a report.
///
/// Stateless: the decision depends only on `(current, total)`.
pub struct ProgressScheduler;

impl ProgressScheduler {
    /// Completion percentage of `current` out of `total`, computed as
    /// `current / total * 100` in `f64`.
    pub fn percentage(current: usize, total: usize) -> f64 {
        current as f64 / total as f64 * 100.0
    }

    /// Returns `Checkpoint(p)` when the percentage is exactly one of the
    /// checkpoint values, `None` otherwise.
    ///
    /// The comparison is exact float equality, so runs whose length does not
    /// divide evenly into a checkpoint skip it entirely. `Completion` is never
    /// produced here; the observer raises it when the run ends.
    pub fn trigger(current: usize, total: usize) -> ReportTrigger {
        if total == 0 {
            return ReportTrigger::None;
        }
        let pct = Self::percentage(current, total);
        CHECKPOINT_PERCENTAGES
            .into_iter()
            .find(|&p| pct == f64::from(p))
            .map_or(ReportTrigger::None, ReportTrigger::Checkpoint)
    }

    /// Iteration numbers at which each checkpoint falls, for announcing the
    /// schedule up front: `(total/4, total/2, 3*total/4)`.
    pub fn checkpoint_iterations(total: usize) -> [usize; 3] {
        [total / 4, total / 2, total * 3 / 4]
    }

    /// Whether `current` is the last 0-based iteration of the run.
    pub fn is_final_iteration(current: usize, total: usize) -> bool {
        total > 0 && current == total - 1
    }
}
