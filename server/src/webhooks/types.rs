//! Incoming Webhook Types
//!
//! Records, request payloads and paging parameters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::error::WebhookError;

/// An incoming webhook endpoint bound to one channel.
///
/// `team_id` is copied from the channel when the hook is created and is not
/// updated if the channel later moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct IncomingWebhook {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub team_id: Uuid,
    /// Creator of the hook.
    pub user_id: Uuid,
    pub display_name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create an incoming webhook.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateIncomingWebhookRequest {
    pub channel_id: Uuid,
    #[validate(length(max = 64, message = "Display name must be at most 64 characters"))]
    pub display_name: Option<String>,
    #[validate(length(max = 128, message = "Description must be at most 128 characters"))]
    pub description: Option<String>,
}

impl CreateIncomingWebhookRequest {
    /// Check the payload before any lookup happens.
    pub fn check(&self) -> Result<(), WebhookError> {
        if self.channel_id.is_nil() {
            return Err(WebhookError::InvalidParameter("channel_id".to_string()));
        }

        self.validate()
            .map_err(|e| WebhookError::InvalidParameter(format!("webhook: {e}")))
    }
}

/// Query parameters for listing incoming webhooks.
///
/// Without `team_id` the listing spans every team and needs the system-wide
/// grant. Paging values that do not parse fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListIncomingWebhooksQuery {
    /// Restrict the listing to one team.
    #[serde(default, deserialize_with = "lenient_team_id")]
    pub team_id: Option<Uuid>,
    /// Zero-based page index.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub page: Option<i64>,
    /// Page size; clamped to the configured maximum.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub per_page: Option<i64>,
}

/// Empty means absent; anything else that is not a number is ignored.
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.trim().parse().ok()))
}

/// Empty means absent. An id that does not parse names no team, so it maps
/// to the nil id, which nobody holds a grant on.
fn lenient_team_id<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .map(|v| v.parse().unwrap_or(Uuid::nil())))
}

/// Page-size bounds applied to listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_per_page: u32,
    pub max_per_page: u32,
}

/// Validated paging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    /// Normalize raw paging input.
    ///
    /// A missing or negative page becomes the first page. A missing or
    /// non-positive page size becomes `limits.default_per_page`, and an
    /// oversized one is clamped to `limits.max_per_page`. Pages past the end
    /// are allowed and simply come back empty.
    #[must_use]
    pub fn from_query(page: Option<i64>, per_page: Option<i64>, limits: PageLimits) -> Self {
        let page = page.filter(|p| *p >= 0).unwrap_or(0);
        let per_page = per_page
            .filter(|n| *n > 0)
            .unwrap_or_else(|| i64::from(limits.default_per_page));

        Self {
            page: u32::try_from(page).unwrap_or(u32::MAX),
            per_page: u32::try_from(per_page)
                .unwrap_or(u32::MAX)
                .min(limits.max_per_page),
        }
    }

    /// SQL `LIMIT`.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.per_page as i64
    }

    /// SQL `OFFSET`.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.page as i64 * self.per_page as i64
    }
}

/// Parse a hook id taken from the request path.
pub fn parse_hook_id(raw: &str) -> Result<Uuid, WebhookError> {
    raw.trim()
        .parse::<Uuid>()
        .ok()
        .filter(|id| !id.is_nil())
        .ok_or_else(|| WebhookError::InvalidParameter("hook_id".to_string()))
}
