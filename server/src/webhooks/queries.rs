//! Incoming Webhook Store
//!
//! Persistence for webhook records. Uses runtime queries (`sqlx::query` /
//! `sqlx::query_as`) to avoid requiring a live database at compile time.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::types::{IncomingWebhook, Pagination};
use crate::db::BackendResult;

/// Webhook persistence consumed by the service.
///
/// Listings must come back in a stable order so that consecutive pages
/// neither repeat nor skip records.
#[async_trait]
pub trait WebhookStore: Send + Sync {
    /// Persist a fully populated record and return it as stored.
    async fn create(&self, hook: &IncomingWebhook) -> BackendResult<IncomingWebhook>;

    async fn get(&self, hook_id: Uuid) -> BackendResult<Option<IncomingWebhook>>;

    /// Delete by id. Deleting an id that is already gone is not an error.
    async fn delete(&self, hook_id: Uuid) -> BackendResult<()>;

    async fn list_by_team(
        &self,
        team_id: Uuid,
        page: Pagination,
    ) -> BackendResult<Vec<IncomingWebhook>>;

    async fn list_all(&self, page: Pagination) -> BackendResult<Vec<IncomingWebhook>>;
}

/// `PostgreSQL`-backed store over `incoming_webhooks`.
#[derive(Debug, Clone)]
pub struct PgWebhookStore {
    pool: PgPool,
}

impl PgWebhookStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WebhookStore for PgWebhookStore {
    async fn create(&self, hook: &IncomingWebhook) -> BackendResult<IncomingWebhook> {
        let created = sqlx::query_as::<_, IncomingWebhook>(
            r"
            INSERT INTO incoming_webhooks
                (id, channel_id, team_id, user_id, display_name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, channel_id, team_id, user_id, display_name, description,
                      created_at, updated_at
            ",
        )
        .bind(hook.id)
        .bind(hook.channel_id)
        .bind(hook.team_id)
        .bind(hook.user_id)
        .bind(&hook.display_name)
        .bind(&hook.description)
        .bind(hook.created_at)
        .bind(hook.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get(&self, hook_id: Uuid) -> BackendResult<Option<IncomingWebhook>> {
        let hook = sqlx::query_as::<_, IncomingWebhook>(
            r"
            SELECT id, channel_id, team_id, user_id, display_name, description,
                   created_at, updated_at
            FROM incoming_webhooks
            WHERE id = $1
            ",
        )
        .bind(hook_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hook)
    }

    async fn delete(&self, hook_id: Uuid) -> BackendResult<()> {
        sqlx::query("DELETE FROM incoming_webhooks WHERE id = $1")
            .bind(hook_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_by_team(
        &self,
        team_id: Uuid,
        page: Pagination,
    ) -> BackendResult<Vec<IncomingWebhook>> {
        let hooks = sqlx::query_as::<_, IncomingWebhook>(
            r"
            SELECT id, channel_id, team_id, user_id, display_name, description,
                   created_at, updated_at
            FROM incoming_webhooks
            WHERE team_id = $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(team_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(hooks)
    }

    async fn list_all(&self, page: Pagination) -> BackendResult<Vec<IncomingWebhook>> {
        let hooks = sqlx::query_as::<_, IncomingWebhook>(
            r"
            SELECT id, channel_id, team_id, user_id, display_name, description,
                   created_at, updated_at
            FROM incoming_webhooks
            ORDER BY created_at ASC, id ASC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(hooks)
    }
}
