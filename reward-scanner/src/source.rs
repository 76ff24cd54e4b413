use async_trait::async_trait;
use hive_client::api::SORT_CREATED;
use hive_client::{HiveApi, RankedPostsQuery, Transport};
use rewarder_core::{CoreError, Cursor, Post, Reply, ScanConfig};

/// Read access to a newest-first post feed.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Page of posts starting strictly after `start`; the start cursor
    /// requests the newest page.
    async fn ranked_page(&self, start: &Cursor) -> Result<Vec<Post>, CoreError>;

    async fn direct_replies(&self, author: &str, permlink: &str) -> Result<Vec<Reply>, CoreError>;
}

/// Creation-ordered Hive feed.
#[derive(Debug)]
pub struct HiveFeed<T> {
    api: HiveApi<T>,
    tag: String,
    observer: String,
    limit: u32,
}

impl<T: Transport> HiveFeed<T> {
    pub fn new(api: HiveApi<T>, config: &ScanConfig) -> Self {
        Self {
            api,
            tag: config.tag.clone(),
            observer: config.observer.clone(),
            limit: config.page_limit,
        }
    }

    pub fn api(&self) -> &HiveApi<T> {
        &self.api
    }
}

#[async_trait]
impl<T: Transport> FeedSource for HiveFeed<T> {
    async fn ranked_page(&self, start: &Cursor) -> Result<Vec<Post>, CoreError> {
        let query = RankedPostsQuery {
            sort: SORT_CREATED,
            tag: &self.tag,
            observer: &self.observer,
            limit: self.limit,
            start,
        };
        self.api.get_ranked_posts(&query).await
    }

    async fn direct_replies(&self, author: &str, permlink: &str) -> Result<Vec<Reply>, CoreError> {
        self.api.get_content_replies(author, permlink).await
    }
}
