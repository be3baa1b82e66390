//! Permission tokens and the scopes they are evaluated at.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::team::TeamPermissions;

/// Permission token checked by the webhook management plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Manage incoming webhooks (team or system scope).
    ManageWebhooks,
    /// Read a channel's content (channel scope).
    ReadChannel,
}

impl Permission {
    /// Stable name used in error bodies and audit rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use hooks_server::permissions::Permission;
    ///
    /// assert_eq!(Permission::ManageWebhooks.as_str(), "manage_webhooks");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ManageWebhooks => "manage_webhooks",
            Self::ReadChannel => "read_channel",
        }
    }

    /// Matching team permission bit.
    #[must_use]
    pub const fn team_flag(&self) -> TeamPermissions {
        match self {
            Self::ManageWebhooks => TeamPermissions::MANAGE_WEBHOOKS,
            Self::ReadChannel => TeamPermissions::READ_CHANNEL,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a permission is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionScope {
    /// Instance-wide grant (the broadest level).
    System,
    /// Grant held within one team.
    Team(Uuid),
    /// Grant held on one channel.
    Channel(Uuid),
}

impl PermissionScope {
    /// Short kind name for log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Team(_) => "team",
            Self::Channel(_) => "channel",
        }
    }
}
