//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `users.role` in
//! `20260301000001_create_users_table.sql`.

pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MECHANIC: &str = "mechanic";

/// All valid role names, used by registration and role-change validation.
pub const ALL_ROLES: [&str; 3] = [ROLE_CUSTOMER, ROLE_ADMIN, ROLE_MECHANIC];

/// Whether a role counts as shop staff (admin or mechanic).
pub fn is_staff(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_MECHANIC
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_roles() {
        assert!(is_staff(ROLE_ADMIN));
        assert!(is_staff(ROLE_MECHANIC));
        assert!(!is_staff(ROLE_CUSTOMER));
        assert!(!is_staff("someone-else"));
    }
}
