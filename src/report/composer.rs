use chrono::{DateTime, TimeZone};

use crate::chart::ChartKind;
use crate::history::IterationSnapshot;
use crate::report::html::snapshot_table;
use crate::report::report::Report;
use crate::schedule::{ProgressScheduler, RemainingTime};

/// Rows shown in an interim report.
pub const CHECKPOINT_TAIL: usize = 3;
/// Rows shown in the final report.
pub const END_TAIL: usize = 10;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Builds the three kinds of report a run produces.
///
/// Pure: every input, including the wall-clock time shown in the text, is
/// passed in by the caller.
pub struct ReportComposer;

impl ReportComposer {
    /// Announcement sent when training starts. Carries no charts.
    pub fn compose_start<Tz>(run_name: &str, total_iterations: usize, started_at: &DateTime<Tz>) -> Report
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let when = started_at.format(TIME_FORMAT).to_string();
        let [quarter, half, three_quarters] = ProgressScheduler::checkpoint_iterations(total_iterations);
        let html_body = format!(
            "<h1>Training has started at {when}, running for {total_iterations} iterations</h1>\n\
             <p>Updates will be sent at 25% (iteration {quarter}), 50% (iteration {half}), \
             75% (iteration {three_quarters}) and 100% (iteration {total_iterations})</p>"
        );
        Report {
            subject: format!("{run_name} Training Started at {when}"),
            html_body,
            needs_charts: false,
        }
    }

    /// Interim report at a checkpoint: last rows, both charts, and the
    /// expected time to completion.
    pub fn compose_checkpoint(
        run_name: &str,
        percentage: u8,
        recent: &[IterationSnapshot],
        estimated_remaining: RemainingTime,
    ) -> Report {
        let iteration = recent.last().map_or(0, |s| s.index);
        let html_body = format!(
            "<h1>Training has reached {percentage}% completion</h1>\n\
             <h2>Last {CHECKPOINT_TAIL} training rows can be seen below.</h2>\n\
             {table}\n\
             {charts}\n\
             <br>\n<br>\n\
             <p>Training expected to complete in {estimated_remaining}.</p>",
            table = snapshot_table(recent),
            charts = chart_sections(iteration),
        );
        Report {
            subject: format!("{run_name} Training At {percentage}%"),
            html_body,
            needs_charts: true,
        }
    }

    /// Final report when training ends: last rows and both charts.
    pub fn compose_end<Tz>(run_name: &str, recent: &[IterationSnapshot], ended_at: &DateTime<Tz>) -> Report
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let when = ended_at.format(TIME_FORMAT).to_string();
        let completed = recent.last().map_or(0, |s| s.index + 1);
        let html_body = format!(
            "<h1>Training has ended at {when}</h1>\n\
             <h2>Last {END_TAIL} training rows can be seen below.</h2>\n\
             {table}\n\
             {charts}",
            table = snapshot_table(recent),
            charts = chart_sections(completed),
        );
        Report {
            subject: format!("{run_name} Training Ended at {when}"),
            html_body,
            needs_charts: true,
        }
    }
}

/// Headings plus one `cid:` image reference per chart kind.
fn chart_sections(iterations: usize) -> String {
    ChartKind::ALL
        .iter()
        .map(|kind| {
            format!(
                "<h2>{} Graph After {iterations} Iterations</h2>\n<img src=\"cid:{}\"></img>",
                kind.y_label(),
                kind.placeholder(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::html::count_data_rows;
    use chrono::Utc;
    use std::time::Duration;

    fn snap(index: usize) -> IterationSnapshot {
        IterationSnapshot {
            index,
            loss: 0.3,
            accuracy: 0.9,
            validation_loss: 0.4,
            validation_accuracy: 0.85,
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn start_report_announces_schedule_without_charts() {
        let report = ReportComposer::compose_start("resnet", 100, &at());
        assert_eq!(report.subject, "resnet Training Started at 2024-03-01 12:30:00");
        assert!(!report.needs_charts);
        assert!(report.html_body.contains("running for 100 iterations"));
        assert!(report.html_body.contains("25% (iteration 25)"));
        assert!(report.html_body.contains("50% (iteration 50)"));
        assert!(report.html_body.contains("75% (iteration 75)"));
        assert!(report.html_body.contains("100% (iteration 100)"));
        assert!(!report.html_body.contains("cid:"));
    }

    #[test]
    fn checkpoint_report_has_table_charts_and_estimate() {
        let rows = [snap(48), snap(49), snap(50)];
        let report = ReportComposer::compose_checkpoint(
            "resnet",
            50,
            &rows,
            RemainingTime(Duration::from_secs(125)),
        );
        assert_eq!(report.subject, "resnet Training At 50%");
        assert!(report.needs_charts);
        assert!(report.html_body.contains("reached 50% completion"));
        assert!(report.html_body.contains("<img src=\"cid:accuracy\">"));
        assert!(report.html_body.contains("<img src=\"cid:loss\">"));
        assert!(report.html_body.contains("Accuracy Graph After 50 Iterations"));
        assert!(report.html_body.contains("complete in 0:02:05."));
        assert_eq!(count_data_rows(&report.html_body), 3);
    }

    #[test]
    fn checkpoint_table_is_as_long_as_available_history() {
        for n in 0..=3 {
            let rows: Vec<_> = (0..n).map(snap).collect();
            let report = ReportComposer::compose_checkpoint("r", 25, &rows, RemainingTime::ZERO);
            assert_eq!(count_data_rows(&report.html_body), n);
        }
    }

    #[test]
    fn end_report_has_charts_and_no_estimate() {
        let rows: Vec<_> = (0..10).map(snap).collect();
        let report = ReportComposer::compose_end("resnet", &rows, &at());
        assert_eq!(report.subject, "resnet Training Ended at 2024-03-01 12:30:00");
        assert!(report.needs_charts);
        assert!(report.html_body.contains("Loss Graph After 10 Iterations"));
        assert!(!report.html_body.contains("expected to complete"));
        assert_eq!(count_data_rows(&report.html_body), 10);
    }
}
