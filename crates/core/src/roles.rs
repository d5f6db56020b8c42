//! Role names shared between the user store and the API authorization layer.

/// Students and guests: may open tickets and follow their own.
pub const ROLE_STUDENT: &str = "student";

/// Staff: may work tickets in their department.
pub const ROLE_STAFF: &str = "staff";

/// Admins: full ticket and user management.
pub const ROLE_ADMIN: &str = "admin";

/// Superadmins: admins that cannot be locked out or deactivated to zero.
pub const ROLE_SUPERADMIN: &str = "superadmin";

/// Whether a role grants staff capabilities (internal notes, status
/// changes, assignment).
pub fn is_staff(role: &str) -> bool {
    matches!(role, ROLE_STAFF | ROLE_ADMIN | ROLE_SUPERADMIN)
}

/// Whether a role grants administrative capabilities (user management,
/// manual sweep runs).
pub fn is_admin(role: &str) -> bool {
    matches!(role, ROLE_ADMIN | ROLE_SUPERADMIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_roles() {
        assert!(is_staff(ROLE_STAFF));
        assert!(is_staff(ROLE_ADMIN));
        assert!(is_staff(ROLE_SUPERADMIN));
        assert!(!is_staff(ROLE_STUDENT));
        assert!(!is_staff("visitor"));
    }

    #[test]
    fn admin_roles() {
        assert!(is_admin(ROLE_ADMIN));
        assert!(is_admin(ROLE_SUPERADMIN));
        assert!(!is_admin(ROLE_STAFF));
        assert!(!is_admin(ROLE_STUDENT));
    }
}
