use rewarder_core::{RewardEstimate, FULL_WEIGHT};

/// Hive pays half of a post's reward pool to curators. The pending payout
/// figure covers the whole pool while beneficiaries only draw from the
/// author half, so their allocation is divided by this factor.
pub const REWARD_POOL_SPLIT: f64 = 2.0;

/// Average amount reaching each author-upvoted reply.
///
/// With no upvoted replies yet, the whole distributable amount is returned
/// and flagged as an estimate.
pub fn estimate(payout: f64, weight: u16, upvoted_replies: u32) -> RewardEstimate {
    let allocation = payout * f64::from(weight) / f64::from(FULL_WEIGHT);
    let distributable = allocation / REWARD_POOL_SPLIT;

    if upvoted_replies > 0 {
        RewardEstimate {
            per_reply: distributable / f64::from(upvoted_replies),
            is_estimate: false,
        }
    } else {
        RewardEstimate {
            per_reply: distributable,
            is_estimate: true,
        }
    }
}
