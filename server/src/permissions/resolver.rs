//! Permission resolution logic.
//!
//! Computes effective team permissions for a member from their roles.

use uuid::Uuid;

use super::team::TeamPermissions;

/// Compute team permissions for a user.
///
/// Resolution order:
/// 1. Team owner has all permissions
/// 2. Start with @everyone role permissions
/// 3. Add permissions from assigned roles
pub fn compute_team_permissions(
    user_id: Uuid,
    team_owner_id: Uuid,
    everyone_permissions: TeamPermissions,
    role_permissions: &[TeamPermissions],
) -> TeamPermissions {
    if team_owner_id == user_id {
        return TeamPermissions::all();
    }

    role_permissions
        .iter()
        .fold(everyone_permissions, |perms, role| perms | *role)
}
