//! Channel & Team Lookup
//!
//! Read-only view of channels and teams. The webhook plane never mutates
//! either; it only reads a channel's team and type.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::db::BackendResult;

/// Channel type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema,
)]
#[sqlx(type_name = "channel_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    /// Readable by every team member.
    Open,
    Private,
    Direct,
    Group,
}

impl ChannelType {
    /// Open channels need no per-channel read grant.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Channel snapshot used by the permission gate.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Channel {
    pub id: Uuid,
    /// `None` for direct and group channels.
    pub team_id: Option<Uuid>,
    pub channel_type: ChannelType,
}

/// Channel/team lookup consumed by the webhook service.
#[async_trait]
pub trait ChannelLookup: Send + Sync {
    /// Fetch a channel, `None` if it does not exist.
    async fn get_channel(&self, channel_id: Uuid) -> BackendResult<Option<Channel>>;

    /// Whether a team with this id exists.
    async fn team_exists(&self, team_id: Uuid) -> BackendResult<bool>;
}

/// `PostgreSQL`-backed lookup.
#[derive(Debug, Clone)]
pub struct PgChannelLookup {
    pool: PgPool,
}

impl PgChannelLookup {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChannelLookup for PgChannelLookup {
    async fn get_channel(&self, channel_id: Uuid) -> BackendResult<Option<Channel>> {
        let channel = sqlx::query_as::<_, Channel>(
            "SELECT id, team_id, channel_type FROM channels WHERE id = $1",
        )
        .bind(channel_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(channel)
    }

    async fn team_exists(&self, team_id: Uuid) -> BackendResult<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM teams WHERE id = $1)")
                .bind(team_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}
