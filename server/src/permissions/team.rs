//! Team-level permissions using bitflags.
//!
//! Only the bits the webhook gate reads are defined here. Unknown bits coming
//! from the database are dropped on load.

use bitflags::bitflags;

bitflags! {
    /// Team permissions represented as a 64-bit bitfield.
    ///
    /// Stored as BIGINT in PostgreSQL (`team_roles.permissions`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct TeamPermissions: u64 {
        /// Permission to read open channels of the team
        const READ_CHANNEL     = 1 << 0;
        /// Permission to create, inspect and revoke incoming webhooks
        const MANAGE_WEBHOOKS  = 1 << 1;
    }
}

impl TeamPermissions {
    /// Default permissions for the @everyone role.
    pub const EVERYONE_DEFAULT: Self = Self::READ_CHANNEL;

    /// Create permissions from a database BIGINT value.
    ///
    /// Reinterprets the i64 bit pattern; bits outside the known set are ignored.
    #[must_use]
    pub const fn from_db(value: i64) -> Self {
        let bits = value as u64;
        Self::from_bits_truncate(bits)
    }

    /// Check if this permission set includes the specified permission(s).
    ///
    /// # Examples
    ///
    /// ```
    /// use hooks_server::permissions::TeamPermissions;
    ///
    /// let perms = TeamPermissions::READ_CHANNEL;
    /// assert!(perms.has(TeamPermissions::READ_CHANNEL));
    /// assert!(!perms.has(TeamPermissions::MANAGE_WEBHOOKS));
    /// ```
    #[must_use]
    pub const fn has(self, permission: Self) -> bool {
        self.contains(permission)
    }
}

impl Default for TeamPermissions {
    fn default() -> Self {
        Self::empty()
    }
}
