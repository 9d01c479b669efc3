//! Role gates
//!
//! Each API area is open to a fixed set of roles. The owner can reach
//! every area; menu and event stream only need a login.

use shared::models::Role;

/// Tables and order intake
pub const FLOOR_ROLES: &[Role] = &[Role::Waiter, Role::Owner];

/// Kitchen board
pub const KITCHEN_ROLES: &[Role] = &[Role::Kitchen, Role::Owner];

/// Billing ledger
pub const BILLING_ROLES: &[Role] = &[Role::Owner];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_reaches_every_area() {
        for roles in [FLOOR_ROLES, KITCHEN_ROLES, BILLING_ROLES] {
            assert!(roles.contains(&Role::Owner));
        }
    }

    #[test]
    fn test_staff_areas_are_separate() {
        assert!(!FLOOR_ROLES.contains(&Role::Kitchen));
        assert!(!KITCHEN_ROLES.contains(&Role::Waiter));
        assert!(!BILLING_ROLES.contains(&Role::Waiter));
        assert!(!BILLING_ROLES.contains(&Role::Kitchen));
    }
}
