//! Audit Log
//!
//! Records who attempted which webhook operation and how it ended.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::BackendResult;

/// Audited webhook operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuditAction {
    #[serde(rename = "incoming_hook.create")]
    CreateIncomingHook,
    #[serde(rename = "incoming_hook.list")]
    ListIncomingHooks,
    #[serde(rename = "incoming_hook.get")]
    GetIncomingHook,
    #[serde(rename = "incoming_hook.delete")]
    DeleteIncomingHook,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateIncomingHook => "incoming_hook.create",
            Self::ListIncomingHooks => "incoming_hook.list",
            Self::GetIncomingHook => "incoming_hook.get",
            Self::DeleteIncomingHook => "incoming_hook.delete",
        }
    }
}

/// How an audited operation ended (or that it started).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuditOutcome {
    #[serde(rename = "attempt")]
    Attempt,
    #[serde(rename = "success")]
    Success,
    /// Denied at the team tier (missing `MANAGE_WEBHOOKS`).
    #[serde(rename = "fail - bad permissions")]
    PermissionDenied,
    /// Team manager without read access to a restricted channel.
    #[serde(rename = "fail - bad channel permissions")]
    ChannelPermissionDenied,
}

impl AuditOutcome {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Attempt => "attempt",
            Self::Success => "success",
            Self::PermissionDenied => "fail - bad permissions",
            Self::ChannelPermissionDenied => "fail - bad channel permissions",
        }
    }
}

/// One audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    pub actor_id: Uuid,
    pub action: AuditAction,
    pub outcome: AuditOutcome,
    /// Hook id for get/delete, channel id for create, team id for list.
    pub target_id: Option<Uuid>,
}

impl AuditEvent {
    #[must_use]
    pub const fn new(
        actor_id: Uuid,
        action: AuditAction,
        outcome: AuditOutcome,
        target_id: Option<Uuid>,
    ) -> Self {
        Self {
            actor_id,
            action,
            outcome,
            target_id,
        }
    }
}

/// Destination for audit events.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, event: AuditEvent) -> BackendResult<()>;
}

/// Writes audit events to the `audit_log` table.
#[derive(Debug, Clone)]
pub struct PgAuditLog {
    pool: PgPool,
}

impl PgAuditLog {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PgAuditLog {
    async fn record(&self, event: AuditEvent) -> BackendResult<()> {
        sqlx::query(
            r"
            INSERT INTO audit_log (actor_id, action, outcome, target_id)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(event.actor_id)
        .bind(event.action.as_str())
        .bind(event.outcome.as_str())
        .bind(event.target_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_as_str() {
        for outcome in [
            AuditOutcome::Attempt,
            AuditOutcome::Success,
            AuditOutcome::PermissionDenied,
            AuditOutcome::ChannelPermissionDenied,
        ] {
            let json = serde_json::to_string(&outcome).unwrap();
            assert_eq!(json, format!("\"{}\"", outcome.as_str()));
        }

        for action in [
            AuditAction::CreateIncomingHook,
            AuditAction::ListIncomingHooks,
            AuditAction::GetIncomingHook,
            AuditAction::DeleteIncomingHook,
        ] {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str()));
        }
    }

    #[test]
    fn test_channel_failure_is_distinct() {
        assert_ne!(
            AuditOutcome::PermissionDenied.as_str(),
            AuditOutcome::ChannelPermissionDenied.as_str()
        );
    }
}
