use std::fmt;

/// Why (and whether) a report is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTrigger {
    None,
    /// Progress reached one of the fixed checkpoints; holds 25, 50 or 75.
    Checkpoint(u8),
    /// The run finished.
    Completion,
}

impl ReportTrigger {
    pub fn is_due(self) -> bool {
        !matches!(self, ReportTrigger::None)
    }
}

impl fmt::Display for ReportTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportTrigger::None              => f.write_str("none"),
            ReportTrigger::Checkpoint(pct)   => write!(f, "checkpoint {pct}%"),
            ReportTrigger::Completion        => f.write_str("completion"),
        }
    }
}
