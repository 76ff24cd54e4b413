//! Newest-first walk over the ranked feed.
//!
//! The walker pages through posts by creation time and emits one
//! [`ReportLine`] per post that names the configured account as a
//! beneficiary with at least the configured weight. The feed is time
//! ordered, so the first qualifying post older than the cutoff ends the
//! walk.

use crate::estimator::estimate;
use crate::source::FeedSource;
use crate::votes::count_author_upvoted_replies;
use chrono::NaiveDateTime;
use rewarder_core::{CoreError, Cursor, Post, ReportLine, ScanConfig};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneReason {
    /// A qualifying post older than the cutoff was reached.
    CutoffReached,
    /// The feed returned an empty page or stopped advancing.
    FeedExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    Walking,
    Done(DoneReason),
}

pub struct FeedWalker<'a, F: ?Sized> {
    source: &'a F,
    account: &'a str,
    min_weight: u16,
    cutoff: NaiveDateTime,
    state: WalkState,
    page_cursor: Cursor,
    pages: usize,
    lines: Vec<ReportLine>,
}

impl<'a, F: FeedSource + ?Sized> FeedWalker<'a, F> {
    /// `now` is the UTC reference time the look-back window is measured from.
    pub fn new(source: &'a F, config: &'a ScanConfig, now: NaiveDateTime) -> Self {
        Self {
            source,
            account: &config.beneficiary_account,
            min_weight: config.min_beneficiary_weight,
            cutoff: now - config.window(),
            state: WalkState::Walking,
            page_cursor: Cursor::default(),
            pages: 0,
            lines: Vec::new(),
        }
    }

    pub fn state(&self) -> WalkState {
        self.state
    }

    pub fn cutoff(&self) -> NaiveDateTime {
        self.cutoff
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Lines emitted so far. Still valid after a failed step.
    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<ReportLine> {
        self.lines
    }

    /// Walks pages until the walk is done or a request fails.
    pub async fn run(&mut self) -> Result<DoneReason, CoreError> {
        info!(
            "Scanning posts created after {} for @{} beneficiaries >= {} bp",
            self.cutoff, self.account, self.min_weight
        );

        loop {
            if let WalkState::Done(reason) = self.state {
                info!(
                    "Scan finished ({:?}) after {} pages with {} qualifying posts",
                    reason,
                    self.pages,
                    self.lines.len()
                );
                return Ok(reason);
            }
            self.step().await?;
        }
    }

    /// Fetches and processes one page.
    pub async fn step(&mut self) -> Result<(), CoreError> {
        if self.state != WalkState::Walking {
            return Ok(());
        }

        if self.page_cursor.is_start() {
            debug!("Requesting the newest page");
        }
        let page = self.source.ranked_page(&self.page_cursor).await?;
        self.pages += 1;
        debug!("Page {}: {} posts", self.pages, page.len());

        let Some(last) = page.last() else {
            info!("Feed returned an empty page before the cutoff");
            self.state = WalkState::Done(DoneReason::FeedExhausted);
            return Ok(());
        };
        if last.cursor() == self.page_cursor {
            info!("Feed did not advance past @{}/{}", last.author, last.permlink);
            self.state = WalkState::Done(DoneReason::FeedExhausted);
            return Ok(());
        }

        let mut last_processed = None;
        for post in &page {
            last_processed = Some(post);

            let Some(beneficiary) = post.qualifying_beneficiary(self.account, self.min_weight)
            else {
                continue;
            };

            if post.created < self.cutoff {
                debug!(
                    "@{}/{} created {} is past the cutoff",
                    post.author, post.permlink, post.created
                );
                self.state = WalkState::Done(DoneReason::CutoffReached);
                break;
            }

            let weight = beneficiary.weight;
            self.record(post, weight).await?;
        }

        if let Some(post) = last_processed {
            self.page_cursor = post.cursor();
        }
        Ok(())
    }

    async fn record(&mut self, post: &Post, weight: u16) -> Result<(), CoreError> {
        let match_cursor = post.cursor();

        let upvoted = if post.children > 0 {
            count_author_upvoted_replies(self.source, &match_cursor.author, &match_cursor.permlink)
                .await?
        } else {
            0
        };

        let estimate = estimate(post.pending_payout.amount, weight, upvoted);
        let line = ReportLine {
            index: self.lines.len() + 1,
            author: match_cursor.author,
            permlink: match_cursor.permlink,
            upvoted_reply_count: upvoted,
            total_reply_count: post.children,
            estimate,
            symbol: post.pending_payout.symbol.clone(),
        };

        debug!(
            "#{} @{}/{}: {}/{} replies upvoted, {} {} per reply",
            line.index,
            line.author,
            line.permlink,
            upvoted,
            post.children,
            estimate.per_reply,
            line.symbol
        );
        self.lines.push(line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate};
    use rewarder_core::{ActiveVote, Asset, Beneficiary, HiveApiError, Reply};
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn post(permlink: &str, hours_ago: i64, weight: Option<u16>, children: u32) -> Post {
        Post {
            author: "alice".to_string(),
            permlink: permlink.to_string(),
            created: now() - Duration::hours(hours_ago),
            pending_payout: Asset::new(10.0, "HBD"),
            children,
            beneficiaries: weight.map(|weight| {
                vec![Beneficiary {
                    account: "commentrewarder".to_string(),
                    weight,
                }]
            }),
        }
    }

    /// Serves fixed pages keyed by the start cursor's permlink.
    struct PagedFeed {
        pages: HashMap<String, Vec<Post>>,
        replies: HashMap<String, Vec<Reply>>,
        requests: Mutex<Vec<Cursor>>,
        reply_lookups: Mutex<Vec<String>>,
    }

    impl PagedFeed {
        fn new(pages: Vec<Vec<Post>>) -> Self {
            let mut by_start = HashMap::new();
            let mut start = String::new();
            for page in pages {
                let next = page.last().map(|p| p.permlink.clone()).unwrap_or_default();
                by_start.insert(start, page);
                start = next;
            }
            Self {
                pages: by_start,
                replies: HashMap::new(),
                requests: Mutex::new(Vec::new()),
                reply_lookups: Mutex::new(Vec::new()),
            }
        }

        fn with_replies(mut self, permlink: &str, voters: &[&[&str]]) -> Self {
            let replies = voters
                .iter()
                .map(|vs| Reply {
                    active_votes: Some(
                        vs.iter()
                            .map(|v| ActiveVote {
                                voter: v.to_string(),
                            })
                            .collect(),
                    ),
                })
                .collect();
            self.replies.insert(permlink.to_string(), replies);
            self
        }
    }

    #[async_trait]
    impl FeedSource for PagedFeed {
        async fn ranked_page(&self, start: &Cursor) -> Result<Vec<Post>, CoreError> {
            self.requests.lock().unwrap().push(start.clone());
            Ok(self.pages.get(&start.permlink).cloned().unwrap_or_default())
        }

        async fn direct_replies(
            &self,
            _author: &str,
            permlink: &str,
        ) -> Result<Vec<Reply>, CoreError> {
            self.reply_lookups.lock().unwrap().push(permlink.to_string());
            self.replies
                .get(permlink)
                .cloned()
                .ok_or_else(|| {
                    HiveApiError::InvalidResponse {
                        method: "replies".to_string(),
                        details: format!("no replies scripted for {}", permlink),
                    }
                    .into()
                })
        }
    }

    #[tokio::test]
    async fn test_stops_at_first_qualifying_post_past_cutoff() {
        let feed = PagedFeed::new(vec![
            vec![post("p1", 1, Some(500), 0), post("p2", 2, Some(300), 0)],
            vec![
                post("p3", 3, Some(1000), 0),
                post("old", 30, Some(500), 0),
                post("older", 31, Some(500), 0),
            ],
            vec![post("never", 40, Some(500), 0)],
        ]);
        let config = ScanConfig::default();
        let mut walker = FeedWalker::new(&feed, &config, now());

        assert_eq!(walker.run().await.unwrap(), DoneReason::CutoffReached);
        assert_eq!(walker.state(), WalkState::Done(DoneReason::CutoffReached));
        assert_eq!(walker.pages_fetched(), 2);

        let lines = walker.into_lines();
        let indexed: Vec<(usize, &str)> =
            lines.iter().map(|l| (l.index, l.permlink.as_str())).collect();
        assert_eq!(indexed, vec![(1, "p1"), (2, "p2"), (3, "p3")]);
    }

    #[tokio::test]
    async fn test_non_qualifying_posts_advance_cursor_but_do_not_stop() {
        let feed = PagedFeed::new(vec![
            vec![post("new", 1, Some(500), 0), post("plain-old", 30, None, 0)],
            vec![post("low-weight-old", 31, Some(299), 0)],
            vec![post("qualifying-old", 32, Some(300), 0)],
        ]);
        let config = ScanConfig::default();
        let mut walker = FeedWalker::new(&feed, &config, now());

        assert_eq!(walker.run().await.unwrap(), DoneReason::CutoffReached);
        assert_eq!(walker.lines().len(), 1);

        let requests = feed.requests.lock().unwrap().clone();
        assert_eq!(
            requests,
            vec![
                Cursor::default(),
                Cursor::new("alice", "plain-old"),
                Cursor::new("alice", "low-weight-old"),
            ]
        );
    }

    #[tokio::test]
    async fn test_weight_threshold_is_inclusive() {
        let feed = PagedFeed::new(vec![vec![
            post("w299", 1, Some(299), 0),
            post("w300", 2, Some(300), 0),
            post("stop", 30, Some(300), 0),
        ]]);
        let config = ScanConfig::default();
        let mut walker = FeedWalker::new(&feed, &config, now());
        walker.run().await.unwrap();

        let permlinks: Vec<&str> = walker.lines().iter().map(|l| l.permlink.as_str()).collect();
        assert_eq!(permlinks, vec!["w300"]);
    }

    #[tokio::test]
    async fn test_post_created_at_cutoff_is_reported() {
        let feed = PagedFeed::new(vec![vec![
            post("at-cutoff", 24, Some(500), 0),
            post("past-cutoff", 25, Some(500), 0),
        ]]);
        let config = ScanConfig::default();
        let mut walker = FeedWalker::new(&feed, &config, now());

        assert_eq!(walker.cutoff(), feed.pages[""][0].created);
        assert_eq!(walker.run().await.unwrap(), DoneReason::CutoffReached);

        let permlinks: Vec<&str> = walker.lines().iter().map(|l| l.permlink.as_str()).collect();
        assert_eq!(permlinks, vec!["at-cutoff"]);
    }

    #[tokio::test]
    async fn test_reply_lookup_only_when_children() {
        let feed = PagedFeed::new(vec![vec![
            post("with-replies", 1, Some(500), 3),
            post("no-replies", 2, Some(500), 0),
            post("stop", 30, Some(500), 0),
        ]])
        .with_replies(
            "with-replies",
            &[&["alice", "bob"], &["carol"], &["alice"]],
        );
        let config = ScanConfig::default();
        let mut walker = FeedWalker::new(&feed, &config, now());
        walker.run().await.unwrap();

        assert_eq!(*feed.reply_lookups.lock().unwrap(), vec!["with-replies"]);

        let lines = walker.lines();
        assert_eq!(lines[0].upvoted_reply_count, 2);
        assert_eq!(lines[0].total_reply_count, 3);
        assert_eq!(lines[0].estimate.per_reply, 0.125);
        assert!(!lines[0].estimate.is_estimate);

        assert_eq!(lines[1].upvoted_reply_count, 0);
        assert_eq!(lines[1].estimate.per_reply, 0.25);
        assert!(lines[1].estimate.is_estimate);
    }

    #[tokio::test]
    async fn test_empty_page_ends_walk() {
        let feed = PagedFeed::new(vec![vec![post("p1", 1, Some(500), 0)], vec![]]);
        let config = ScanConfig::default();
        let mut walker = FeedWalker::new(&feed, &config, now());

        assert_eq!(walker.run().await.unwrap(), DoneReason::FeedExhausted);
        assert_eq!(walker.lines().len(), 1);
        assert_eq!(walker.pages_fetched(), 2);
    }

    #[tokio::test]
    async fn test_failure_keeps_emitted_lines() {
        let feed = PagedFeed::new(vec![vec![
            post("ok", 1, Some(500), 0),
            post("broken", 2, Some(500), 1),
            post("unreached", 3, Some(500), 0),
        ]]);
        let config = ScanConfig::default();
        let mut walker = FeedWalker::new(&feed, &config, now());

        assert!(walker.run().await.is_err());
        assert_eq!(walker.state(), WalkState::Walking);
        assert_eq!(walker.lines().len(), 1);
        assert_eq!(walker.lines()[0].permlink, "ok");
    }

    #[tokio::test]
    async fn test_step_after_done_is_noop() {
        let feed = PagedFeed::new(vec![vec![]]);
        let config = ScanConfig::default();
        let mut walker = FeedWalker::new(&feed, &config, now());

        walker.step().await.unwrap();
        walker.step().await.unwrap();
        assert_eq!(walker.pages_fetched(), 1);
    }

    #[tokio::test]
    async fn test_custom_window() {
        let feed = PagedFeed::new(vec![vec![
            post("recent", 1, Some(500), 0),
            post("yesterday", 30, Some(500), 0),
            post("stop", 50, Some(500), 0),
        ]]);
        let config = ScanConfig {
            window_hours: 48,
            ..ScanConfig::default()
        };
        let mut walker = FeedWalker::new(&feed, &config, now());
        assert_eq!(walker.cutoff(), now() - Duration::hours(48));

        walker.run().await.unwrap();
        assert_eq!(walker.lines().len(), 2);
    }
}
