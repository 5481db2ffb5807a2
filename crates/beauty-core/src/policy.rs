//! # Access Policy
//!
//! Role checks enforced by every manager command before it touches the store.
//!
//! ```text
//! ┌──────────────────────────────────────┬───────┬──────────┐
//! │ Action                               │ admin │ employee │
//! ├──────────────────────────────────────┼───────┼──────────┤
//! │ ViewInventory, ViewSales, RecordSale │  yes  │   yes    │
//! │ ViewReports, ExportData              │  yes  │   yes    │
//! │ ManageProducts                       │  yes  │   no     │
//! │ VoidSale                             │  yes  │   no     │
//! │ ManageUsers                          │  yes  │   no     │
//! └──────────────────────────────────────┴───────┴──────────┘
//! ```
//!
//! The dashboard may hide buttons for employees, but that is cosmetic.
//! These checks are the boundary.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Role, User};

/// Something a signed-in user may try to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ViewInventory,
    ViewSales,
    RecordSale,
    ViewReports,
    ExportData,
    ManageProducts,
    VoidSale,
    ManageUsers,
}

impl Action {
    /// Phrase used in the `Forbidden` message: "Not allowed to {phrase}".
    pub fn describe(&self) -> &'static str {
        match self {
            Action::ViewInventory => "view inventory",
            Action::ViewSales => "view sales",
            Action::RecordSale => "record sales",
            Action::ViewReports => "view reports",
            Action::ExportData => "export data",
            Action::ManageProducts => "manage products",
            Action::VoidSale => "void sales",
            Action::ManageUsers => "manage users",
        }
    }

    fn admin_only(&self) -> bool {
        matches!(
            self,
            Action::ManageProducts | Action::VoidSale | Action::ManageUsers
        )
    }
}

/// Checks whether `role` may perform `action`.
///
/// ## Example
/// ```rust
/// use beauty_core::{authorize, Action, Role};
///
/// assert!(authorize(Role::Employee, Action::RecordSale).is_ok());
/// assert!(authorize(Role::Employee, Action::ManageProducts).is_err());
/// ```
pub fn authorize(role: Role, action: Action) -> CoreResult<()> {
    match role {
        Role::Admin => Ok(()),
        Role::Employee if !action.admin_only() => Ok(()),
        Role::Employee => Err(CoreError::Forbidden {
            action: action.describe().to_string(),
        }),
    }
}

// =============================================================================
// Account Rules
// =============================================================================

/// Rejects deleting `target` when it would break an account invariant.
///
/// `admin_count` is the number of admins currently stored.
pub fn check_user_deletion(actor: &User, target: &User, admin_count: i64) -> CoreResult<()> {
    if actor.id == target.id {
        return Err(CoreError::SelfDeletion);
    }
    if target.is_admin() && admin_count <= 1 {
        return Err(CoreError::LastAdmin);
    }
    Ok(())
}

/// Rejects changing `target` to `new_role` when that demotes the last admin.
pub fn check_role_change(target: &User, new_role: Role, admin_count: i64) -> CoreResult<()> {
    if target.is_admin() && new_role != Role::Admin && admin_count <= 1 {
        return Err(CoreError::LastAdmin);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const ALL: [Action; 8] = [
        Action::ViewInventory,
        Action::ViewSales,
        Action::RecordSale,
        Action::ViewReports,
        Action::ExportData,
        Action::ManageProducts,
        Action::VoidSale,
        Action::ManageUsers,
    ];

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.to_string(),
            name: id.to_string(),
            email: format!("{id}@beautyshop.com"),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_may_do_everything() {
        for action in ALL {
            assert!(authorize(Role::Admin, action).is_ok(), "{action:?}");
        }
    }

    #[test]
    fn test_employee_matrix() {
        let allowed: Vec<Action> = ALL
            .into_iter()
            .filter(|a| authorize(Role::Employee, *a).is_ok())
            .collect();
        assert_eq!(
            allowed,
            vec![
                Action::ViewInventory,
                Action::ViewSales,
                Action::RecordSale,
                Action::ViewReports,
                Action::ExportData,
            ]
        );

        let err = authorize(Role::Employee, Action::ManageUsers).unwrap_err();
        assert_eq!(err.to_string(), "Not allowed to manage users");
    }

    #[test]
    fn test_self_deletion_rejected() {
        let admin = user("admin", Role::Admin);
        assert!(matches!(
            check_user_deletion(&admin, &admin, 2),
            Err(CoreError::SelfDeletion)
        ));
    }

    #[test]
    fn test_last_admin_deletion_rejected() {
        let actor = user("a1", Role::Admin);
        let other = user("a2", Role::Admin);
        assert!(matches!(
            check_user_deletion(&actor, &other, 1),
            Err(CoreError::LastAdmin)
        ));
        assert!(check_user_deletion(&actor, &other, 2).is_ok());
        assert!(check_user_deletion(&actor, &user("e1", Role::Employee), 1).is_ok());
    }

    #[test]
    fn test_last_admin_demotion_rejected() {
        let admin = user("a1", Role::Admin);
        assert!(matches!(
            check_role_change(&admin, Role::Employee, 1),
            Err(CoreError::LastAdmin)
        ));
        assert!(check_role_change(&admin, Role::Admin, 1).is_ok());
        assert!(check_role_change(&admin, Role::Employee, 2).is_ok());
    }
}
