//! Incoming Webhook Management Service
//!
//! Create, list, get and delete, each composed from the channel lookup, the
//! authorization gate and the store. The service keeps no state between calls
//! and can be shared freely across request handlers.

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::error::WebhookError;
use super::gate::{authorize, Decision, GateTarget};
use super::queries::{PgWebhookStore, WebhookStore};
use super::types::{
    CreateIncomingWebhookRequest, IncomingWebhook, ListIncomingWebhooksQuery, PageLimits,
    Pagination,
};
use crate::audit::{AuditAction, AuditEvent, AuditOutcome, AuditSink, PgAuditLog};
use crate::channels::{ChannelLookup, PgChannelLookup};
use crate::config::Config;
use crate::permissions::{
    Permission, PermissionEvaluator, PermissionScope, PgPermissionEvaluator,
};

/// Incoming webhook management over externally owned collaborators.
#[derive(Clone)]
pub struct WebhookService {
    channels: Arc<dyn ChannelLookup>,
    permissions: Arc<dyn PermissionEvaluator>,
    store: Arc<dyn WebhookStore>,
    audit: Arc<dyn AuditSink>,
    limits: PageLimits,
}

impl WebhookService {
    #[must_use]
    pub fn new(
        channels: Arc<dyn ChannelLookup>,
        permissions: Arc<dyn PermissionEvaluator>,
        store: Arc<dyn WebhookStore>,
        audit: Arc<dyn AuditSink>,
        limits: PageLimits,
    ) -> Self {
        Self {
            channels,
            permissions,
            store,
            audit,
            limits,
        }
    }

    /// Wire every collaborator to `PostgreSQL`.
    #[must_use]
    pub fn from_pool(pool: PgPool, config: &Config) -> Self {
        Self::new(
            Arc::new(PgChannelLookup::new(pool.clone())),
            Arc::new(PgPermissionEvaluator::new(pool.clone())),
            Arc::new(PgWebhookStore::new(pool.clone())),
            Arc::new(PgAuditLog::new(pool)),
            PageLimits {
                default_per_page: config.default_per_page,
                max_per_page: config.max_per_page,
            },
        )
    }

    /// Create an incoming webhook in `req.channel_id` owned by `user_id`.
    #[instrument(skip(self, req), fields(channel_id = %req.channel_id))]
    pub async fn create(
        &self,
        user_id: Uuid,
        req: CreateIncomingWebhookRequest,
    ) -> Result<IncomingWebhook, WebhookError> {
        req.check()?;

        let channel = self
            .channels
            .get_channel(req.channel_id)
            .await?
            .ok_or(WebhookError::ChannelNotFound)?;

        if let Some(team_id) = channel.team_id {
            if !self.channels.team_exists(team_id).await? {
                return Err(WebhookError::TeamNotFound);
            }
        }

        let action = AuditAction::CreateIncomingHook;
        self.audit
            .record(AuditEvent::new(
                user_id,
                action,
                AuditOutcome::Attempt,
                Some(channel.id),
            ))
            .await?;

        let decision =
            authorize(self.permissions.as_ref(), user_id, &GateTarget::for_channel(&channel))
                .await?;
        self.enforce(user_id, action, Some(channel.id), decision)
            .await?;

        // The gate never allows a channel without a team.
        let team_id = channel
            .team_id
            .ok_or(WebhookError::PermissionDenied(Permission::ManageWebhooks))?;

        let now = Utc::now();
        let hook = IncomingWebhook {
            id: Uuid::now_v7(),
            channel_id: channel.id,
            team_id,
            user_id,
            display_name: req.display_name.unwrap_or_default(),
            description: req.description.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let created = self.store.create(&hook).await?;

        self.record_success(user_id, action, created.id).await;
        info!(hook_id = %created.id, team_id = %created.team_id, "Incoming webhook created");

        Ok(created)
    }

    /// List incoming webhooks, team-scoped when `query.team_id` is set.
    ///
    /// A team listing needs `MANAGE_WEBHOOKS` on that team; a global listing
    /// needs it system-wide. Neither grant stands in for the other. Paging
    /// input is normalized, never rejected.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: Uuid,
        query: &ListIncomingWebhooksQuery,
    ) -> Result<Vec<IncomingWebhook>, WebhookError> {
        let scope = query
            .team_id
            .map_or(PermissionScope::System, PermissionScope::Team);

        let allowed = self
            .permissions
            .has_permission(user_id, scope, Permission::ManageWebhooks)
            .await?;

        if !allowed {
            let decision = Decision::Deny(Permission::ManageWebhooks);
            self.enforce(user_id, AuditAction::ListIncomingHooks, query.team_id, decision)
                .await?;
        }

        let page = Pagination::from_query(query.page, query.per_page, self.limits);
        let hooks = match query.team_id {
            Some(team_id) => self.store.list_by_team(team_id, page).await?,
            None => self.store.list_all(page).await?,
        };

        Ok(hooks)
    }

    /// Fetch one incoming webhook.
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid, hook_id: Uuid) -> Result<IncomingWebhook, WebhookError> {
        self.load_authorized(user_id, hook_id, AuditAction::GetIncomingHook)
            .await
    }

    /// Revoke an incoming webhook.
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, hook_id: Uuid) -> Result<(), WebhookError> {
        let action = AuditAction::DeleteIncomingHook;
        let hook = self.load_authorized(user_id, hook_id, action).await?;

        self.store.delete(hook.id).await?;

        self.record_success(user_id, action, hook.id).await;
        info!(hook_id = %hook.id, team_id = %hook.team_id, "Incoming webhook deleted");

        Ok(())
    }

    /// Resolve a hook and its live channel, then run the gate.
    ///
    /// A missing hook is reported before any permission is evaluated.
    async fn load_authorized(
        &self,
        user_id: Uuid,
        hook_id: Uuid,
        action: AuditAction,
    ) -> Result<IncomingWebhook, WebhookError> {
        if hook_id.is_nil() {
            return Err(WebhookError::InvalidParameter("hook_id".to_string()));
        }

        let hook = self
            .store
            .get(hook_id)
            .await?
            .ok_or(WebhookError::HookNotFound)?;

        let channel = self
            .channels
            .get_channel(hook.channel_id)
            .await?
            .ok_or(WebhookError::ChannelNotFound)?;

        if action == AuditAction::DeleteIncomingHook {
            self.audit
                .record(AuditEvent::new(
                    user_id,
                    action,
                    AuditOutcome::Attempt,
                    Some(hook.id),
                ))
                .await?;
        }

        let decision =
            authorize(self.permissions.as_ref(), user_id, &GateTarget::for_hook(&hook, &channel))
                .await?;
        self.enforce(user_id, action, Some(hook.id), decision)
            .await?;

        Ok(hook)
    }

    /// Turn a gate decision into a result, auditing denials.
    ///
    /// The denial is returned even if its audit record cannot be written.
    async fn enforce(
        &self,
        user_id: Uuid,
        action: AuditAction,
        target_id: Option<Uuid>,
        decision: Decision,
    ) -> Result<(), WebhookError> {
        let Decision::Deny(permission) = decision else {
            return Ok(());
        };

        let outcome = match permission {
            Permission::ReadChannel => AuditOutcome::ChannelPermissionDenied,
            Permission::ManageWebhooks => AuditOutcome::PermissionDenied,
        };

        warn!(
            %user_id,
            action = action.as_str(),
            permission = permission.as_str(),
            "Incoming webhook access denied"
        );

        let event = AuditEvent::new(user_id, action, outcome, target_id);
        if let Err(e) = self.audit.record(event).await {
            error!(error = %e, %user_id, action = action.as_str(), "Failed to write audit log");
        }

        Err(WebhookError::PermissionDenied(permission))
    }

    /// Record success after the change is committed.
    ///
    /// A failure here is logged, not returned: the change already happened.
    async fn record_success(&self, user_id: Uuid, action: AuditAction, hook_id: Uuid) {
        let event = AuditEvent::new(user_id, action, AuditOutcome::Success, Some(hook_id));
        if let Err(e) = self.audit.record(event).await {
            error!(error = %e, %hook_id, action = action.as_str(), "Failed to write audit log");
        }
    }
}
