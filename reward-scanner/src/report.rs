use crate::source::FeedSource;
use crate::walker::{DoneReason, FeedWalker};
use chrono::NaiveDateTime;
use rewarder_core::{CoreError, ReportLine, ScanConfig};
use std::time::Duration;

/// Outcome of one scan. `lines` holds everything emitted before a failure.
#[derive(Debug)]
pub struct ScanReport {
    pub lines: Vec<ReportLine>,
    pub outcome: Result<DoneReason, CoreError>,
}

impl ScanReport {
    pub fn reached_cutoff(&self) -> bool {
        matches!(self.outcome, Ok(DoneReason::CutoffReached))
    }

    /// Printable report: a header when the walk reached the cutoff, then one
    /// entry per line.
    pub fn render(&self, config: &ScanConfig) -> Vec<String> {
        let mut out = Vec::with_capacity(self.lines.len() + 1);
        if self.reached_cutoff() {
            out.push(header(config));
        }
        out.extend(
            self.lines
                .iter()
                .map(|line| render_line(line, &config.post_link_base)),
        );
        out
    }
}

/// Runs a full walk starting at `now` (UTC).
pub async fn scan<F: FeedSource + ?Sized>(
    source: &F,
    config: &ScanConfig,
    now: NaiveDateTime,
) -> ScanReport {
    let mut walker = FeedWalker::new(source, config, now);
    let outcome = walker.run().await;
    ScanReport {
        lines: walker.into_lines(),
        outcome,
    }
}

pub fn header(config: &ScanConfig) -> String {
    format!(
        "Posts published in the last {} hours with @{} as beneficiary:",
        config.window_hours, config.beneficiary_account
    )
}

pub fn render_line(line: &ReportLine, link_base: &str) -> String {
    let qualifier = if line.estimate.is_estimate {
        " (potentially)"
    } else {
        ""
    };
    format!(
        "{}) {}/@{}/{} with {} replies upvoted out of {} replies: {} {}{} going on average to each upvoted comment\n",
        line.index,
        link_base.trim_end_matches('/'),
        line.author,
        line.permlink,
        line.upvoted_reply_count,
        line.total_reply_count,
        line.estimate.per_reply,
        line.symbol,
        qualifier
    )
}

pub fn elapsed_line(elapsed: Duration) -> String {
    format!("Work completed in {:.2} seconds", elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewarder_core::{HiveApiError, RewardEstimate};

    fn line(index: usize, per_reply: f64, is_estimate: bool) -> ReportLine {
        ReportLine {
            index,
            author: "alice".to_string(),
            permlink: "hello-world".to_string(),
            upvoted_reply_count: if is_estimate { 0 } else { 2 },
            total_reply_count: 5,
            estimate: RewardEstimate {
                per_reply,
                is_estimate,
            },
            symbol: "HBD".to_string(),
        }
    }

    #[test]
    fn test_render_confirmed_line() {
        assert_eq!(
            render_line(&line(1, 0.125, false), "https://www.peakd.com"),
            "1) https://www.peakd.com/@alice/hello-world with 2 replies upvoted out of 5 replies: \
             0.125 HBD going on average to each upvoted comment\n"
        );
    }

    #[test]
    fn test_render_potential_line() {
        let rendered = render_line(&line(7, 0.25, true), "https://hive.blog/");
        assert!(rendered.starts_with("7) https://hive.blog/@alice/hello-world with 0 replies"));
        assert!(rendered.contains("0.25 HBD (potentially) going on average"));
    }

    #[test]
    fn test_header_only_when_cutoff_reached() {
        let config = ScanConfig::default();

        let complete = ScanReport {
            lines: vec![line(1, 0.125, false)],
            outcome: Ok(DoneReason::CutoffReached),
        };
        let rendered = complete.render(&config);
        assert_eq!(rendered.len(), 2);
        assert_eq!(
            rendered[0],
            "Posts published in the last 24 hours with @commentrewarder as beneficiary:"
        );

        let exhausted = ScanReport {
            lines: vec![line(1, 0.125, false)],
            outcome: Ok(DoneReason::FeedExhausted),
        };
        let rendered = exhausted.render(&config);
        assert_eq!(rendered.len(), 1);
        assert!(rendered[0].starts_with("1) "));

        let partial = ScanReport {
            lines: vec![line(1, 0.125, false)],
            outcome: Err(HiveApiError::AllEndpointsFailed { attempted: 4 }.into()),
        };
        let rendered = partial.render(&config);
        assert_eq!(rendered.len(), 1);
        assert!(rendered[0].starts_with("1) "));
    }

    #[test]
    fn test_elapsed_line() {
        assert_eq!(
            elapsed_line(Duration::from_millis(1234)),
            "Work completed in 1.23 seconds"
        );
    }
}
