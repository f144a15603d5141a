//! Well-known role name constants.
//!
//! These must match the CHECK constraint seeded in
//! `20260301000001_create_users_table.sql`.

pub const ROLE_USER: &str = "user";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_ADMIN: &str = "admin";

/// All assignable roles, lowest privilege first.
pub const ALL_ROLES: &[&str] = &[ROLE_USER, ROLE_MODERATOR, ROLE_ADMIN];

/// Check whether a string names a known role.
pub fn is_valid_role(role: &str) -> bool {
    ALL_ROLES.contains(&role)
}
