use std::time::Duration;

use tracing::info;

use crate::crawler::CrawlReport;

pub fn format_elapsed(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms >= 60000 {
        let mins = total_ms / 60000;
        let secs = (total_ms % 60000) / 1000;
        format!("{}m {}s", mins, secs)
    } else if total_ms >= 1000 {
        let secs = total_ms / 1000;
        let ms_remaining = total_ms % 1000;
        if ms_remaining > 0 {
            format!("{}s {}ms", secs, ms_remaining)
        } else {
            format!("{}s", secs)
        }
    } else {
        format!("{}ms", total_ms)
    }
}

/// Logs the end-of-run summary, including every page that failed.
pub fn display_report(report: &CrawlReport, elapsed: Duration) {
    info!(
        "{} of {} pages downloaded, {} skipped, {} failed in {}",
        report.completed,
        report.queued,
        report.skipped,
        report.failed.len(),
        format_elapsed(elapsed)
    );

    if !report.failed.is_empty() {
        info!("failed to download the following pages:");
        for failed in &report.failed {
            info!("   {} ({}): {}", failed.page, failed.kind, failed.reason);
        }
    }

    if report.interrupted {
        info!("interrupted, run the same range again to resume");
    }
}
