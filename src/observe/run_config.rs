use std::path::PathBuf;

use crate::error::ObserverError;

/// Fixed parameters of one training run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    total_iterations: usize,
    run_name: String,
}

impl RunConfig {
    /// Fails with `ZeroIterations` when `total_iterations == 0`.
    pub fn new(total_iterations: usize, run_name: impl Into<String>) -> Result<Self, ObserverError> {
        if total_iterations == 0 {
            return Err(ObserverError::ZeroIterations);
        }
        Ok(RunConfig { total_iterations, run_name: run_name.into() })
    }

    pub fn total_iterations(&self) -> usize {
        self.total_iterations
    }

    pub fn run_name(&self) -> &str {
        &self.run_name
    }
}

/// Optional observer behaviour beyond composing and sending reports.
#[derive(Debug, Clone, Default)]
pub struct ObserverOptions {
    /// When set, every rendered chart is also kept on disk as
    /// `<dir>/accuracy.<ext>` and `<dir>/loss.<ext>`, replacing the previous
    /// report's files.
    pub chart_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_iterations_rejected() {
        assert!(matches!(RunConfig::new(0, "x"), Err(ObserverError::ZeroIterations)));
    }

    #[test]
    fn keeps_name_and_total() {
        let cfg = RunConfig::new(40, "cifar").unwrap();
        assert_eq!(cfg.total_iterations(), 40);
        assert_eq!(cfg.run_name(), "cifar");
    }
}
