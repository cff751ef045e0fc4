use std::fmt;
use std::time::Duration;

/// Expected time until the run finishes, printed as `H:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct RemainingTime(pub Duration);

impl RemainingTime {
    pub const ZERO: RemainingTime = RemainingTime(Duration::ZERO);

    pub fn as_duration(self) -> Duration {
        self.0
    }
}

impl fmt::Display for RemainingTime {
    /// Whole seconds only; runs longer than a day get a `N day(s), ` prefix.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.as_secs();
        let days = total / 86_400;
        let hours = (total % 86_400) / 3_600;
        let minutes = (total % 3_600) / 60;
        let seconds = total % 60;
        match days {
            0 => {}
            1 => f.write_str("1 day, ")?,
            n => write!(f, "{n} days, ")?,
        }
        write!(f, "{hours}:{minutes:02}:{seconds:02}")
    }
}

/// Linear extrapolation of the remaining run time.
pub struct DurationEstimator;

impl DurationEstimator {
    /// `last_iteration_secs * iterations_remaining`.
    ///
    /// Only the most recent iteration is used, so the estimate follows
    /// slowdowns and speedups immediately. Negative or NaN inputs collapse to
    /// zero; estimates past what `Duration` can hold saturate to `Duration::MAX`.
    pub fn estimate_remaining(last_iteration_secs: f64, iterations_remaining: usize) -> RemainingTime {
        if iterations_remaining == 0 {
            return RemainingTime::ZERO;
        }
        let secs = last_iteration_secs * iterations_remaining as f64;
        match Duration::try_from_secs_f64(secs) {
            Ok(d) => RemainingTime(d),
            Err(_) if secs > 0.0 => RemainingTime(Duration::MAX),
            Err(_) => RemainingTime::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplies_last_duration_by_remaining() {
        let est = DurationEstimator::estimate_remaining(2.0, 5);
        assert_eq!(est.as_duration(), Duration::from_secs(10));
    }

    #[test]
    fn nothing_remaining_is_zero() {
        for last in [0.0, 0.5, 3.25, 1e9] {
            assert_eq!(DurationEstimator::estimate_remaining(last, 0), RemainingTime::ZERO);
        }
    }

    #[test]
    fn invalid_inputs_collapse_to_zero() {
        assert_eq!(DurationEstimator::estimate_remaining(-1.0, 3), RemainingTime::ZERO);
        assert_eq!(DurationEstimator::estimate_remaining(f64::NAN, 3), RemainingTime::ZERO);
    }

    #[test]
    fn overflowing_estimate_saturates() {
        assert_eq!(DurationEstimator::estimate_remaining(1e19, 10), RemainingTime(Duration::MAX));
        assert_eq!(DurationEstimator::estimate_remaining(f64::INFINITY, 1), RemainingTime(Duration::MAX));
        assert_ne!(DurationEstimator::estimate_remaining(1e19, 10).to_string(), "0:00:00");
    }

    #[test]
    fn formats_as_hours_minutes_seconds() {
        assert_eq!(RemainingTime(Duration::from_secs(10)).to_string(), "0:00:10");
        assert_eq!(RemainingTime(Duration::from_secs(3_725)).to_string(), "1:02:05");
        assert_eq!(RemainingTime(Duration::from_millis(59_999)).to_string(), "0:00:59");
    }

    #[test]
    fn formats_days() {
        assert_eq!(RemainingTime(Duration::from_secs(86_400 + 61)).to_string(), "1 day, 0:01:01");
        assert_eq!(RemainingTime(Duration::from_secs(3 * 86_400)).to_string(), "3 days, 0:00:00");
    }
}
