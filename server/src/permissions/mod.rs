//! Permission system types and utilities.
//!
//! Permissions are granted at three scopes:
//! - System: instance-wide grants held by system admins
//! - Team: role-based grants within one team
//! - Channel: explicit read access to restricted channels

pub mod evaluator;
pub mod resolver;
pub mod scope;
pub mod team;

pub use evaluator::{PermissionEvaluator, PgPermissionEvaluator};
pub use resolver::compute_team_permissions;
pub use scope::{Permission, PermissionScope};
pub use team::TeamPermissions;
