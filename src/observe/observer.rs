use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::chart::artifact::{chart_path, write_replacing};
use crate::chart::{ChartKind, ChartRenderer, ChartRequest};
use crate::error::{ChartRenderError, ObserverError};
use crate::history::MetricHistory;
use crate::notify::{InlineImage, Notifier, OutgoingMessage};
use crate::observe::iteration_metrics::IterationMetrics;
use crate::observe::run_config::{ObserverOptions, RunConfig};
use crate::report::{Report, ReportComposer, CHECKPOINT_TAIL, END_TAIL};
use crate::schedule::{DurationEstimator, ProgressScheduler, ReportTrigger};

/// Lifecycle position of a `TrainingObserver`. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    Idle,
    Running,
    Finished,
}

impl ObserverState {
    pub fn as_str(self) -> &'static str {
        match self {
            ObserverState::Idle     => "idle",
            ObserverState::Running  => "running",
            ObserverState::Finished => "finished",
        }
    }
}

impl fmt::Display for ObserverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-run data, present from `on_start` onwards.
struct Run {
    config: RunConfig,
    history: MetricHistory,
    /// Index and start time of the iteration currently in flight.
    iteration_started: Option<(usize, Instant)>,
    /// Wall-clock duration of the most recently completed iteration.
    last_iteration: Duration,
}

impl Run {
    fn reached_final_iteration(&self) -> bool {
        self.history
            .last()
            .is_some_and(|s| ProgressScheduler::is_final_iteration(s.index, self.config.total_iterations()))
    }
}

/// Turns training-loop lifecycle events into progress reports.
///
/// Call order is `on_start`, then any number of
/// `on_iteration_begin`/`on_iteration_end` pairs, then `on_end`, all from the
/// training thread. Chart rendering and delivery run inline and block the
/// caller. A failed report is returned as an error; the observer stays usable
/// and the caller decides whether training goes on.
pub struct TrainingObserver<R, N> {
    renderer: R,
    notifier: N,
    options: ObserverOptions,
    state: ObserverState,
    run: Option<Run>,
}

impl<R: ChartRenderer, N: Notifier> TrainingObserver<R, N> {
    pub fn new(renderer: R, notifier: N) -> Self {
        Self::with_options(renderer, notifier, ObserverOptions::default())
    }

    pub fn with_options(renderer: R, notifier: N, options: ObserverOptions) -> Self {
        TrainingObserver {
            renderer,
            notifier,
            options,
            state: ObserverState::Idle,
            run: None,
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Idle → Running. Sends the start announcement (no charts).
    ///
    /// The transition happens before delivery, so a failed announcement still
    /// leaves the observer running.
    pub fn on_start(&mut self, total_iterations: usize, run_name: &str) -> Result<(), ObserverError> {
        self.require(ObserverState::Idle, "on_start")?;
        let config = RunConfig::new(total_iterations, run_name)?;

        info!(run = %config.run_name(), total_iterations, "training started");
        let report = ReportComposer::compose_start(config.run_name(), total_iterations, &Local::now());

        self.run = Some(Run {
            config,
            history: MetricHistory::new(),
            iteration_started: None,
            last_iteration: Duration::ZERO,
        });
        self.state = ObserverState::Running;

        self.deliver(&report, BTreeMap::new())
    }

    /// Marks the start of iteration `index` for timing.
    pub fn on_iteration_begin(&mut self, index: usize) -> Result<(), ObserverError> {
        self.require(ObserverState::Running, "on_iteration_begin")?;
        let state = self.state.as_str();
        let run = self.run.as_mut().ok_or(ObserverError::InvalidState { operation: "on_iteration_begin", state })?;
        run.iteration_started = Some((index, Instant::now()));
        Ok(())
    }

    /// Records iteration `index` and sends a checkpoint report when one is
    /// due. Returns the trigger that was evaluated.
    ///
    /// Nothing is recorded if a metric is missing or the index does not
    /// directly follow the previous one. Without a matching
    /// `on_iteration_begin` the iteration counts as taking no time.
    pub fn on_iteration_end(
        &mut self,
        index: usize,
        metrics: &IterationMetrics,
    ) -> Result<ReportTrigger, ObserverError> {
        self.require(ObserverState::Running, "on_iteration_end")?;
        let snapshot = metrics.to_snapshot(index)?;

        let state = self.state.as_str();
        let run = self.run.as_mut().ok_or(ObserverError::InvalidState { operation: "on_iteration_end", state })?;
        let elapsed = match run.iteration_started {
            Some((started, at)) if started == index => at.elapsed(),
            _ => Duration::ZERO,
        };
        run.history.append(snapshot)?;
        run.iteration_started = None;
        run.last_iteration = elapsed;

        debug!(
            index,
            loss = snapshot.loss,
            accuracy = snapshot.accuracy,
            val_loss = snapshot.validation_loss,
            val_accuracy = snapshot.validation_accuracy,
            elapsed_ms = elapsed.as_millis() as u64,
            "iteration recorded"
        );

        let total = run.config.total_iterations();
        let trigger = ProgressScheduler::trigger(index, total);
        if let ReportTrigger::Checkpoint(percentage) = trigger {
            let remaining = DurationEstimator::estimate_remaining(
                run.last_iteration.as_secs_f64(),
                total.saturating_sub(index),
            );
            let report = ReportComposer::compose_checkpoint(
                run.config.run_name(),
                percentage,
                run.history.tail(CHECKPOINT_TAIL),
                remaining,
            );
            let charts = render_charts(&self.renderer, &self.options, &run.history)?;
            info!(run = %run.config.run_name(), percentage, index, %remaining, "checkpoint reached");
            self.deliver(&report, charts)?;
        }
        Ok(trigger)
    }

    /// Running → Finished. Sends the final report with charts.
    ///
    /// The transition happens first: a second call fails with
    /// `InvalidState` even if this one could not deliver.
    pub fn on_end(&mut self) -> Result<(), ObserverError> {
        self.require(ObserverState::Running, "on_end")?;
        self.state = ObserverState::Finished;

        let state = self.state.as_str();
        let run = self.run.as_ref().ok_or(ObserverError::InvalidState { operation: "on_end", state })?;
        info!(
            run = %run.config.run_name(),
            trigger = %ReportTrigger::Completion,
            iterations = run.history.len(),
            "training ended"
        );
        if !run.reached_final_iteration() {
            warn!(
                run = %run.config.run_name(),
                recorded = run.history.len(),
                total_iterations = run.config.total_iterations(),
                "training ended before the final iteration"
            );
        }
        let report = ReportComposer::compose_end(run.config.run_name(), run.history.tail(END_TAIL), &Local::now());
        let charts = render_charts(&self.renderer, &self.options, &run.history)?;
        self.deliver(&report, charts)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn state(&self) -> ObserverState {
        self.state
    }

    /// History of the current (or finished) run; `None` before `on_start`.
    pub fn history(&self) -> Option<&MetricHistory> {
        self.run.as_ref().map(|r| &r.history)
    }

    pub fn run_config(&self) -> Option<&RunConfig> {
        self.run.as_ref().map(|r| &r.config)
    }

    /// Duration of the most recently completed iteration.
    pub fn last_iteration_duration(&self) -> Option<Duration> {
        self.run.as_ref().map(|r| r.last_iteration)
    }

    /// Whether the last recorded iteration is the final one of the run.
    pub fn reached_final_iteration(&self) -> bool {
        self.run.as_ref().is_some_and(Run::reached_final_iteration)
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_parts(self) -> (R, N) {
        (self.renderer, self.notifier)
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn require(&self, expected: ObserverState, operation: &'static str) -> Result<(), ObserverError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ObserverError::InvalidState { operation, state: self.state.as_str() })
        }
    }

    fn deliver(&mut self, report: &Report, charts: BTreeMap<String, InlineImage>) -> Result<(), ObserverError> {
        let message = OutgoingMessage::from_report(report, charts);
        self.notifier.send(&message)?;
        Ok(())
    }
}

/// Renders both charts from the full history, keeping copies on disk when
/// a chart directory is configured. Either every chart succeeds or none is
/// returned.
fn render_charts<R: ChartRenderer>(
    renderer: &R,
    options: &ObserverOptions,
    history: &MetricHistory,
) -> Result<BTreeMap<String, InlineImage>, ObserverError> {
    let mut images = BTreeMap::new();
    for kind in ChartKind::ALL {
        let request = ChartRequest::from_history(kind, history);
        let bytes = renderer.render(&request)?;
        if let Some(dir) = &options.chart_dir {
            let path = chart_path(dir, kind.placeholder(), renderer.file_extension());
            write_replacing(&path, &bytes).map_err(ChartRenderError::Io)?;
        }
        images.insert(
            kind.placeholder().to_owned(),
            InlineImage { content_type: renderer.content_type().to_owned(), bytes },
        );
    }
    Ok(images)
}
