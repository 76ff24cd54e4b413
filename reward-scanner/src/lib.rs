pub mod estimator;
pub mod report;
pub mod source;
pub mod votes;
pub mod walker;

pub use estimator::estimate;
pub use report::{scan, ScanReport};
pub use source::{FeedSource, HiveFeed};
pub use votes::count_author_upvoted_replies;
pub use walker::{DoneReason, FeedWalker, WalkState};
