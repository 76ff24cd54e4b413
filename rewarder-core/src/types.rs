use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Account designated to receive a share of a post's payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub account: String,
    /// Share in basis points out of 10000.
    pub weight: u16,
}

/// Snapshot of a post as returned by the ranked-posts feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub author: String,
    pub permlink: String,
    pub created: NaiveDateTime,
    #[serde(rename = "pending_payout_value")]
    pub pending_payout: Asset,
    pub children: u32,
    #[serde(default)]
    pub beneficiaries: Option<Vec<Beneficiary>>,
}

impl Post {
    /// Returns the first beneficiary entry for `account` whose weight is at
    /// least `min_weight` basis points.
    pub fn qualifying_beneficiary(&self, account: &str, min_weight: u16) -> Option<&Beneficiary> {
        self.beneficiaries
            .as_deref()?
            .iter()
            .find(|b| b.account == account && b.weight >= min_weight)
    }

    pub fn cursor(&self) -> Cursor {
        Cursor::new(&self.author, &self.permlink)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveVote {
    pub voter: String,
}

/// Direct reply to a post. Only the voters are consulted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub active_votes: Option<Vec<ActiveVote>>,
}

impl Reply {
    pub fn votes(&self) -> &[ActiveVote] {
        self.active_votes.as_deref().unwrap_or_default()
    }
}

/// Amount with a token symbol, encoded upstream as `"10.000 HBD"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub amount: f64,
    pub symbol: String,
}

impl Asset {
    pub fn new(amount: f64, symbol: impl Into<String>) -> Self {
        Self {
            amount,
            symbol: symbol.into(),
        }
    }
}

impl FromStr for Asset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(amount), Some(symbol), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!("expected \"<amount> <SYMBOL>\", got {:?}", s));
        };

        let amount: f64 = amount
            .parse()
            .map_err(|_| format!("invalid asset amount {:?}", amount))?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(format!("asset amount must be a non-negative number, got {}", amount));
        }

        Ok(Self::new(amount, symbol))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} {}", self.amount, self.symbol)
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for Asset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Position in the ranked feed: the next page starts strictly after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    pub author: String,
    pub permlink: String,
}

impl Cursor {
    pub fn new(author: &str, permlink: &str) -> Self {
        Self {
            author: author.to_string(),
            permlink: permlink.to_string(),
        }
    }

    pub fn is_start(&self) -> bool {
        self.author.is_empty() && self.permlink.is_empty()
    }
}

/// Result of splitting a beneficiary allocation among upvoted replies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardEstimate {
    pub per_reply: f64,
    /// Set when no reply has been upvoted yet and `per_reply` is the whole
    /// distributable amount.
    pub is_estimate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub index: usize,
    pub author: String,
    pub permlink: String,
    pub upvoted_reply_count: u32,
    pub total_reply_count: u32,
    pub estimate: RewardEstimate,
    pub symbol: String,
}
