//! Membership-platform collaborator.
//!
//! [`MembershipClient`] abstracts the external platform that answers
//! "is this identity a member of this group?". The production
//! implementation is [`TelegramClient`], which calls the Bot API
//! `getChatMember` method. The gate treats every error from this layer as
//! non-membership (fail-closed), so nothing here needs to be retried.

use async_trait::async_trait;
use serde::Deserialize;

/// An identity's status within a group, as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Kicked,
}

impl MembershipStatus {
    /// Whether this status counts as membership. Only `left` and `kicked`
    /// do not.
    pub fn is_member(self) -> bool {
        !matches!(self, Self::Left | Self::Kicked)
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "creator" => Some(Self::Creator),
            "administrator" => Some(Self::Administrator),
            "member" => Some(Self::Member),
            "restricted" => Some(Self::Restricted),
            "left" => Some(Self::Left),
            "kicked" => Some(Self::Kicked),
            _ => None,
        }
    }
}

/// Errors from a membership lookup. Callers must treat any of these as
/// non-membership rather than propagate them.
#[derive(Debug, thiserror::Error)]
pub enum MembershipLookupError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed platform response: {0}")]
    Malformed(String),
}

/// Queries the external membership platform for an identity's status in
/// a group.
#[async_trait]
pub trait MembershipClient: Send + Sync {
    async fn membership_status(
        &self,
        group: &str,
        identity: &str,
    ) -> Result<MembershipStatus, MembershipLookupError>;
}

// ---------------------------------------------------------------------------
// Telegram implementation
// ---------------------------------------------------------------------------

/// Default Bot API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    result: Option<ChatMember>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMember {
    status: String,
}

/// Bot API client for membership lookups.
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    /// `base_url` is overridable for tests; pass [`DEFAULT_BASE_URL`] in
    /// production.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl MembershipClient for TelegramClient {
    async fn membership_status(
        &self,
        group: &str,
        identity: &str,
    ) -> Result<MembershipStatus, MembershipLookupError> {
        let url = format!("{}/bot{}/getChatMember", self.base_url, self.token);

        let response = self
            .http
            .get(&url)
            .query(&[("chat_id", group), ("user_id", identity)])
            .send()
            .await
            .map_err(|e| MembershipLookupError::Transport(e.to_string()))?;

        let envelope: ApiEnvelope = response
            .json()
            .await
            .map_err(|e| MembershipLookupError::Malformed(e.to_string()))?;

        if !envelope.ok {
            let description = envelope
                .description
                .unwrap_or_else(|| "request rejected".to_string());
            return Err(MembershipLookupError::Transport(description));
        }

        let member = envelope
            .result
            .ok_or_else(|| MembershipLookupError::Malformed("missing result".to_string()))?;

        MembershipStatus::parse(&member.status).ok_or_else(|| {
            MembershipLookupError::Malformed(format!("unknown status: {}", member.status))
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_and_kicked_are_not_members() {
        assert!(!MembershipStatus::Left.is_member());
        assert!(!MembershipStatus::Kicked.is_member());
    }

    #[test]
    fn every_other_status_is_a_member() {
        for status in [
            MembershipStatus::Creator,
            MembershipStatus::Administrator,
            MembershipStatus::Member,
            MembershipStatus::Restricted,
        ] {
            assert!(status.is_member(), "{status:?} should count as membership");
        }
    }

    #[test]
    fn parses_known_statuses() {
        assert_eq!(
            MembershipStatus::parse("member"),
            Some(MembershipStatus::Member)
        );
        assert_eq!(
            MembershipStatus::parse("kicked"),
            Some(MembershipStatus::Kicked)
        );
        assert_eq!(MembershipStatus::parse("banned"), None);
    }
}
