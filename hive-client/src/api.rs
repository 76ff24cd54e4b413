use crate::gateway::EndpointGateway;
use crate::metrics::MetricsCollector;
use crate::rpc::RpcRequest;
use crate::transport::{HttpTransport, Transport};
use rewarder_core::{CoreError, Cursor, HiveApiError, Post, Reply, ScanConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

pub const GET_RANKED_POSTS: &str = "bridge.get_ranked_posts";
pub const GET_CONTENT_REPLIES: &str = "condenser_api.get_content_replies";

/// Feed ordering by creation time, newest first.
pub const SORT_CREATED: &str = "created";

#[derive(Debug, Clone)]
pub struct RankedPostsQuery<'a> {
    pub sort: &'a str,
    pub tag: &'a str,
    pub observer: &'a str,
    pub limit: u32,
    pub start: &'a Cursor,
}

#[derive(Debug, Serialize)]
struct RankedPostsParams<'a> {
    sort: &'a str,
    tag: &'a str,
    observer: &'a str,
    start_author: &'a str,
    start_permlink: &'a str,
    limit: u32,
}

impl<'a> From<&RankedPostsQuery<'a>> for RankedPostsParams<'a> {
    fn from(query: &RankedPostsQuery<'a>) -> Self {
        Self {
            sort: query.sort,
            tag: query.tag,
            observer: query.observer,
            start_author: &query.start.author,
            start_permlink: &query.start.permlink,
            limit: query.limit,
        }
    }
}

#[derive(Debug)]
pub struct HiveApi<T> {
    gateway: EndpointGateway<T>,
}

impl HiveApi<HttpTransport> {
    /// Builds an API client with one shared HTTP session for the whole run.
    pub fn connect(config: &ScanConfig) -> Result<Self, CoreError> {
        let transport = HttpTransport::new(&config.user_agent, config.request_timeout())?;
        info!(
            "Hive API client ready with {} endpoints",
            config.endpoints.len()
        );
        Ok(Self::new(EndpointGateway::new(
            transport,
            config.endpoints.clone(),
        )))
    }
}

impl<T: Transport> HiveApi<T> {
    pub fn new(gateway: EndpointGateway<T>) -> Self {
        Self { gateway }
    }

    pub fn transport(&self) -> &T {
        self.gateway.transport()
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.gateway.metrics()
    }

    /// Fetches the page of ranked posts that starts strictly after
    /// `query.start`.
    pub async fn get_ranked_posts(
        &self,
        query: &RankedPostsQuery<'_>,
    ) -> Result<Vec<Post>, CoreError> {
        let request = RpcRequest::new(GET_RANKED_POSTS, RankedPostsParams::from(query))?;
        let result = self.gateway.send(&request).await?;
        let posts: Vec<Post> = decode(GET_RANKED_POSTS, result)?;

        debug!(
            "Retrieved {} ranked posts after @{}/{}",
            posts.len(),
            query.start.author,
            query.start.permlink
        );
        Ok(posts)
    }

    /// Fetches the direct replies of a post.
    pub async fn get_content_replies(
        &self,
        author: &str,
        permlink: &str,
    ) -> Result<Vec<Reply>, CoreError> {
        let request = RpcRequest::new(GET_CONTENT_REPLIES, (author, permlink))?;
        let result = self.gateway.send(&request).await?;
        let replies: Vec<Reply> = decode(GET_CONTENT_REPLIES, result)?;

        debug!("Retrieved {} replies for @{}/{}", replies.len(), author, permlink);
        Ok(replies)
    }
}

fn decode<D: DeserializeOwned>(method: &str, result: serde_json::Value) -> Result<D, CoreError> {
    serde_json::from_value(result).map_err(|e| {
        error!("Failed to decode {} payload: {}", method, e);
        CoreError::HiveApi(HiveApiError::InvalidResponse {
            method: method.to_string(),
            details: e.to_string(),
        })
    })
}
