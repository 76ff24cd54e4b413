use crate::source::FeedSource;
use rewarder_core::CoreError;
use tracing::debug;

/// Counts vote entries by `author` across the direct replies of
/// `@author/permlink`. Nested replies are not visited.
pub async fn count_author_upvoted_replies<F: FeedSource + ?Sized>(
    source: &F,
    author: &str,
    permlink: &str,
) -> Result<u32, CoreError> {
    let replies = source.direct_replies(author, permlink).await?;

    let count = replies
        .iter()
        .flat_map(|reply| reply.votes())
        .filter(|vote| vote.voter == author)
        .count() as u32;

    debug!(
        "@{}/{}: {} of {} direct replies upvoted by the author",
        author,
        permlink,
        count,
        replies.len()
    );
    Ok(count)
}
