//! Authorization rules for catalog and user-generated content.
//!
//! Pure predicates over (role, principal, resource owner). Authentication
//! happens first in the API layer's extractors; these functions only decide
//! role and ownership. Keeping them here means the rules are unit-testable
//! without a running server.

use crate::roles::{ROLE_ADMIN, ROLE_MODERATOR};
use crate::types::DbId;

/// Catalog resources (categories, genres, titles) are writable by admins
/// only. Reads are open to everyone, including anonymous clients.
pub fn may_manage_catalog(role: &str) -> bool {
    role == ROLE_ADMIN
}

/// The users resource is admin-only in its entirety.
pub fn may_manage_users(role: &str) -> bool {
    role == ROLE_ADMIN
}

/// Reviews and comments may be modified or deleted by their author, or by
/// a moderator or admin acting on anyone's content.
pub fn may_modify_content(role: &str, principal_id: DbId, author_id: DbId) -> bool {
    if role == ROLE_ADMIN || role == ROLE_MODERATOR {
        return true;
    }
    principal_id == author_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::ROLE_USER;

    #[test]
    fn only_admin_manages_catalog() {
        assert!(may_manage_catalog(ROLE_ADMIN));
        assert!(!may_manage_catalog(ROLE_MODERATOR));
        assert!(!may_manage_catalog(ROLE_USER));
    }

    #[test]
    fn author_may_modify_own_content() {
        assert!(may_modify_content(ROLE_USER, 7, 7));
    }

    #[test]
    fn plain_user_may_not_modify_others_content() {
        assert!(!may_modify_content(ROLE_USER, 7, 8));
    }

    #[test]
    fn moderator_and_admin_modify_any_content() {
        assert!(may_modify_content(ROLE_MODERATOR, 7, 8));
        assert!(may_modify_content(ROLE_ADMIN, 7, 8));
    }

    #[test]
    fn only_admin_manages_users() {
        assert!(may_manage_users(ROLE_ADMIN));
        assert!(!may_manage_users(ROLE_MODERATOR));
        assert!(!may_manage_users(ROLE_USER));
    }
}
