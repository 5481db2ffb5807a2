//! # User Commands
//!
//! Staff accounts screen. Admin only.
//!
//! ```text
//! delete_user(session, id)
//!      │
//!      ├── actor == target           ──► SelfDeletion
//!      ├── target is the last admin  ──► LastAdmin
//!      ▼
//! users.delete(id)  ──► sessions cascade, sales keep employee_name
//! ```

use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::session::require;
use crate::state::DbState;
use beauty_core::policy::{check_role_change, check_user_deletion};
use beauty_core::validation::{validate_new_user, validate_user_patch, validate_uuid};
use beauty_core::{Action, NewUser, Session, User, UserPatch};

/// Lists all staff accounts ordered by name.
pub async fn list_users(db: &DbState, session: &Session) -> Result<Vec<User>, ApiError> {
    require(db, session, Action::ManageUsers).await?;
    debug!("list_users command");
    Ok(db.inner().users().list().await?)
}

/// Creates a staff account.
pub async fn create_user(db: &DbState, session: &Session, new: &NewUser) -> Result<User, ApiError> {
    let actor = require(db, session, Action::ManageUsers).await?;
    debug!(email = %new.email.trim(), role = %new.role, "create_user command");
    validate_new_user(new)?;

    let user = db.inner().users().insert(new).await?;

    info!(id = %user.id, role = %user.role, by = %actor.user.id, "User created");
    Ok(user)
}

/// Updates name, email, role or password of a staff account.
///
/// Demoting the only admin is refused.
pub async fn update_user(
    db: &DbState,
    session: &Session,
    id: &str,
    patch: &UserPatch,
) -> Result<User, ApiError> {
    let actor = require(db, session, Action::ManageUsers).await?;
    debug!(id = %id, "update_user command");
    validate_uuid(id)?;
    validate_user_patch(patch)?;

    let users = db.inner().users();
    let target = users
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    if let Some(role) = patch.role {
        check_role_change(&target, role, users.count_admins().await?)?;
    }

    let user = users.update(id, patch).await?;

    info!(id = %user.id, role = %user.role, by = %actor.user.id, "User updated");
    Ok(user)
}

/// Deletes a staff account. Admins cannot delete themselves or the last admin.
pub async fn delete_user(db: &DbState, session: &Session, id: &str) -> Result<(), ApiError> {
    let actor = require(db, session, Action::ManageUsers).await?;
    debug!(id = %id, "delete_user command");
    validate_uuid(id)?;

    let users = db.inner().users();
    let target = users
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    check_user_deletion(&actor.user, &target, users.count_admins().await?)?;
    users.delete(id).await?;

    info!(id = %id, by = %actor.user.id, "User deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::auth::login;
    use crate::commands::test_support::{demo_state, login_admin, login_employee};
    use crate::error::ErrorCode;
    use beauty_core::Role;

    fn stylist() -> NewUser {
        NewUser {
            name: "Maya Lopez".to_string(),
            email: " Maya@BeautyShop.com ".to_string(),
            role: Role::Employee,
            password: "maya123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_employee_forbidden() {
        let (db, config) = demo_state().await;
        let session = login_employee(&db, &config).await;

        let err = list_users(&db, &session).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let err = create_user(&db, &session, &stylist()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert_eq!(db.inner().users().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_and_sign_in() {
        let (db, config) = demo_state().await;
        let admin = login_admin(&db, &config).await;

        let user = create_user(&db, &admin, &stylist()).await.unwrap();
        assert_eq!(user.email, "maya@beautyshop.com");

        let session = login(&db, &config, "maya@beautyshop.com", "maya123")
            .await
            .unwrap();
        assert_eq!(session.user.id, user.id);

        let err = create_user(&db, &admin, &stylist()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let names: Vec<String> = list_users(&db, &admin)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["Admin User", "Maya Lopez", "Sarah Johnson"]);
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let (db, config) = demo_state().await;
        let admin = login_admin(&db, &config).await;
        let mut new = stylist();
        new.password = "abc".to_string();

        let err = create_user(&db, &admin, &new).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_last_admin_protected() {
        let (db, config) = demo_state().await;
        let admin = login_admin(&db, &config).await;

        let demote = UserPatch {
            role: Some(Role::Employee),
            ..Default::default()
        };
        let err = update_user(&db, &admin, &admin.user.id, &demote)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        let err = delete_user(&db, &admin, &admin.user.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(db.inner().users().count_admins().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_promotion_takes_effect_immediately() {
        let (db, config) = demo_state().await;
        let admin = login_admin(&db, &config).await;
        let employee = login_employee(&db, &config).await;

        let promote = UserPatch {
            role: Some(Role::Admin),
            ..Default::default()
        };
        update_user(&db, &admin, &employee.user.id, &promote)
            .await
            .unwrap();

        // Same token, role re-read from the store
        let users = list_users(&db, &employee).await.unwrap();
        assert_eq!(users.len(), 2);

        // Two admins now, so the original one may be removed by the other
        delete_user(&db, &employee, &admin.user.id).await.unwrap();
        let err = list_users(&db, &admin).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_delete_unknown_user() {
        let (db, config) = demo_state().await;
        let admin = login_admin(&db, &config).await;

        let err = delete_user(&db, &admin, "550e8400-e29b-41d4-a716-446655440000")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
