//! Permission Evaluator
//!
//! Answers "does this caller hold this permission at this scope?". Every call
//! is evaluated against current database state; nothing is cached between
//! requests.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::resolver::compute_team_permissions;
use super::scope::{Permission, PermissionScope};
use super::team::TeamPermissions;
use crate::channels::ChannelType;
use crate::db::BackendResult;

/// Permission lookup consumed by the webhook gate.
#[async_trait]
pub trait PermissionEvaluator: Send + Sync {
    /// Whether `user_id` holds `permission` at `scope`.
    async fn has_permission(
        &self,
        user_id: Uuid,
        scope: PermissionScope,
        permission: Permission,
    ) -> BackendResult<bool>;
}

/// `PostgreSQL`-backed evaluator.
///
/// Scopes are resolved independently: a system grant says nothing about team
/// or channel grants and vice versa.
#[derive(Debug, Clone)]
pub struct PgPermissionEvaluator {
    pool: PgPool,
}

impl PgPermissionEvaluator {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// System admins hold every system-scope permission.
    async fn is_system_admin(&self, user_id: Uuid) -> BackendResult<bool> {
        let row: Option<(Uuid,)> =
            sqlx::query_as("SELECT user_id FROM system_admins WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.is_some())
    }

    /// Computed team permissions, or `None` if the user is not a member.
    async fn team_permissions(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> BackendResult<Option<TeamPermissions>> {
        let owner: Option<(Uuid,)> = sqlx::query_as(
            r"
            SELECT t.owner_id
            FROM teams t
            INNER JOIN team_members tm ON tm.team_id = t.id
            WHERE t.id = $1 AND tm.user_id = $2
            ",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some((owner_id,)) = owner else {
            return Ok(None);
        };

        let everyone: Option<(i64,)> = sqlx::query_as(
            "SELECT permissions FROM team_roles WHERE team_id = $1 AND is_default = true",
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?;

        let everyone_permissions = everyone
            .map(|(bits,)| TeamPermissions::from_db(bits))
            .unwrap_or_default();

        let member_roles: Vec<(i64,)> = sqlx::query_as(
            r"
            SELECT r.permissions
            FROM team_roles r
            INNER JOIN team_member_roles tmr ON tmr.role_id = r.id
            WHERE tmr.team_id = $1 AND tmr.user_id = $2
            ",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let role_permissions: Vec<TeamPermissions> = member_roles
            .into_iter()
            .map(|(bits,)| TeamPermissions::from_db(bits))
            .collect();

        Ok(Some(compute_team_permissions(
            user_id,
            owner_id,
            everyone_permissions,
            &role_permissions,
        )))
    }

    /// READ_CHANNEL on an open channel follows team permissions; on any other
    /// channel type it requires explicit channel membership.
    async fn can_read_channel(&self, channel_id: Uuid, user_id: Uuid) -> BackendResult<bool> {
        let channel: Option<(Option<Uuid>, ChannelType)> =
            sqlx::query_as("SELECT team_id, channel_type FROM channels WHERE id = $1")
                .bind(channel_id)
                .fetch_optional(&self.pool)
                .await?;

        let Some((team_id, channel_type)) = channel else {
            return Ok(false);
        };

        if channel_type.is_open() {
            if let Some(team_id) = team_id {
                return Ok(self
                    .team_permissions(team_id, user_id)
                    .await?
                    .is_some_and(|perms| perms.has(TeamPermissions::READ_CHANNEL)));
            }
        }

        let member: Option<(Uuid,)> = sqlx::query_as(
            "SELECT user_id FROM channel_members WHERE channel_id = $1 AND user_id = $2",
        )
        .bind(channel_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member.is_some())
    }
}

#[async_trait]
impl PermissionEvaluator for PgPermissionEvaluator {
    #[tracing::instrument(skip(self), fields(scope = scope.kind()))]
    async fn has_permission(
        &self,
        user_id: Uuid,
        scope: PermissionScope,
        permission: Permission,
    ) -> BackendResult<bool> {
        match (scope, permission) {
            (PermissionScope::System, _) => self.is_system_admin(user_id).await,
            (PermissionScope::Team(team_id), permission) => Ok(self
                .team_permissions(team_id, user_id)
                .await?
                .is_some_and(|perms| perms.has(permission.team_flag()))),
            (PermissionScope::Channel(channel_id), Permission::ReadChannel) => {
                self.can_read_channel(channel_id, user_id).await
            }
            (PermissionScope::Channel(_), Permission::ManageWebhooks) => Ok(false),
        }
    }
}
