//! Webhook Authorization Gate
//!
//! Two-tier check shared by create, get and delete:
//! 1. `MANAGE_WEBHOOKS` at the team scope, otherwise deny.
//! 2. Open channels are allowed outright.
//! 3. Any other channel type also needs `READ_CHANNEL` on the channel itself.
//!
//! Listing is not channel scoped and does not go through the gate.

use uuid::Uuid;

use super::types::IncomingWebhook;
use crate::channels::{Channel, ChannelType};
use crate::db::BackendResult;
use crate::permissions::{Permission, PermissionEvaluator, PermissionScope};

/// Gate outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Denied for lack of the given permission.
    Deny(Permission),
}

/// What the gate is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateTarget {
    /// Team whose `MANAGE_WEBHOOKS` grant is required.
    pub team_id: Option<Uuid>,
    pub channel_id: Uuid,
    pub channel_type: ChannelType,
}

impl GateTarget {
    /// Target for a channel a hook is about to be created in.
    #[must_use]
    pub const fn for_channel(channel: &Channel) -> Self {
        Self {
            team_id: channel.team_id,
            channel_id: channel.id,
            channel_type: channel.channel_type,
        }
    }

    /// Target for an existing hook.
    ///
    /// The team check uses the team stored on the hook; the channel check uses
    /// the live channel.
    #[must_use]
    pub const fn for_hook(hook: &IncomingWebhook, channel: &Channel) -> Self {
        Self {
            team_id: Some(hook.team_id),
            channel_id: channel.id,
            channel_type: channel.channel_type,
        }
    }
}

/// Pure decision over already-resolved grants.
///
/// `channel_grant` is `None` when `READ_CHANNEL` was never looked up; on a
/// restricted channel that counts as not held.
#[must_use]
pub const fn decide(
    team_grant: bool,
    channel_type: ChannelType,
    channel_grant: Option<bool>,
) -> Decision {
    if !team_grant {
        return Decision::Deny(Permission::ManageWebhooks);
    }

    if channel_type.is_open() {
        return Decision::Allow;
    }

    match channel_grant {
        Some(true) => Decision::Allow,
        _ => Decision::Deny(Permission::ReadChannel),
    }
}

/// Evaluate the gate for `user_id` against `target`.
///
/// `READ_CHANNEL` is only queried when the team tier passed and the channel
/// is restricted.
pub async fn authorize(
    evaluator: &dyn PermissionEvaluator,
    user_id: Uuid,
    target: &GateTarget,
) -> BackendResult<Decision> {
    let team_grant = match target.team_id {
        Some(team_id) => {
            evaluator
                .has_permission(
                    user_id,
                    PermissionScope::Team(team_id),
                    Permission::ManageWebhooks,
                )
                .await?
        }
        None => false,
    };

    if !team_grant || target.channel_type.is_open() {
        return Ok(decide(team_grant, target.channel_type, None));
    }

    let channel_grant = evaluator
        .has_permission(
            user_id,
            PermissionScope::Channel(target.channel_id),
            Permission::ReadChannel,
        )
        .await?;

    Ok(decide(team_grant, target.channel_type, Some(channel_grant)))
}
