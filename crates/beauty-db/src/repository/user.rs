//! # User Repository
//!
//! Staff profiles and their password hashes.
//!
//! ```text
//! profiles
//! ┌──────────┬──────────────┬──────────────────────┬──────────┬───────────────┐
//! │ id       │ name         │ email (NOCASE, uniq) │ role     │ password_hash │
//! ├──────────┼──────────────┼──────────────────────┼──────────┼───────────────┤
//! │ uuid     │ Admin User   │ admin@beautyshop.com │ admin    │ $argon2id$... │
//! │ uuid     │ Sarah Johnson│ sarah@beautyshop.com │ employee │ $argon2id$... │
//! └──────────┴──────────────┴──────────────────────┴──────────┴───────────────┘
//! ```
//!
//! [`User`] never carries the hash. Only [`Credentials`] does, and that type
//! stays inside the login path and snapshot export.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::password::hash_password;
use beauty_core::{NewUser, Role, User, UserPatch};

const USER_COLUMNS: &str = "id, name, email, role, created_at";

/// A profile together with its stored password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Credentials {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub user: User,
    pub password_hash: String,
}

/// Emails are compared and stored trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Repository for profile database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Lists all profiles ordered by name.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM profiles ORDER BY name COLLATE NOCASE, id");
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(users)
    }

    /// Gets a profile by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM profiles WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Finds a profile by email, ignoring case and surrounding whitespace.
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM profiles WHERE email = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Loads a profile and its hash for login.
    pub async fn find_credentials(&self, email: &str) -> DbResult<Option<Credentials>> {
        let sql = format!("SELECT {USER_COLUMNS}, password_hash FROM profiles WHERE email = ?");
        let creds = sqlx::query_as::<_, Credentials>(&sql)
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;
        Ok(creds)
    }

    /// Loads every profile with its hash, for snapshots.
    pub async fn list_credentials(&self) -> DbResult<Vec<Credentials>> {
        let sql = format!(
            "SELECT {USER_COLUMNS}, password_hash FROM profiles ORDER BY created_at, id"
        );
        let creds = sqlx::query_as::<_, Credentials>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(creds)
    }

    /// Counts profiles.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Counts profiles holding the admin role.
    pub async fn count_admins(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE role = ?")
            .bind(Role::Admin)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Creates a profile, hashing the supplied password.
    ///
    /// ## Errors
    /// * `UniqueViolation` - email already in use
    pub async fn insert(&self, new: &NewUser) -> DbResult<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            email: normalize_email(&new.email),
            role: new.role,
            created_at: Utc::now(),
        };

        if self.find_by_email(&user.email).await?.is_some() {
            return Err(DbError::duplicate("email", &user.email));
        }

        let hash = hash_password(&new.password)?;
        insert_user_row(&self.pool, &user, &hash)
            .await
            .map_err(|e| email_conflict(e, &user.email))?;

        info!(id = %user.id, role = %user.role, "Profile created");
        Ok(user)
    }

    /// Applies a partial update. A new password is re-hashed.
    ///
    /// ## Errors
    /// * `NotFound` - no profile with this id
    /// * `UniqueViolation` - new email belongs to another profile
    pub async fn update(&self, id: &str, patch: &UserPatch) -> DbResult<User> {
        debug!(id = %id, "Updating profile");

        let mut user = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))?;

        if let Some(name) = &patch.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = &patch.email {
            let email = normalize_email(email);
            if let Some(other) = self.find_by_email(&email).await? {
                if other.id != user.id {
                    return Err(DbError::duplicate("email", email));
                }
            }
            user.email = email;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }

        let hash = match &patch.password {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let result = sqlx::query(
            r#"
            UPDATE profiles SET
                name = ?,
                email = ?,
                role = ?,
                password_hash = COALESCE(?, password_hash)
            WHERE id = ?
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role)
        .bind(hash)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| email_conflict(e.into(), &user.email))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(user)
    }

    /// Deletes a profile. Their sessions go with it; their sales stay.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting profile");

        let result = sqlx::query("DELETE FROM profiles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }
}

fn email_conflict(err: DbError, email: &str) -> DbError {
    match err {
        DbError::UniqueViolation { .. } => DbError::duplicate("email", email),
        other => other,
    }
}

/// Inserts a profile row with an already-hashed password.
pub(crate) async fn insert_user_row<'e, E>(executor: E, user: &User, password_hash: &str) -> DbResult<()>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("INSERT INTO profiles ({USER_COLUMNS}, password_hash) VALUES (?, ?, ?, ?, ?, ?)");
    sqlx::query(&sql)
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role)
        .bind(user.created_at)
        .bind(password_hash)
        .execute(executor)
        .await?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::verify_password;
    use crate::{Database, DbConfig};

    fn sarah() -> NewUser {
        NewUser {
            name: "Sarah Johnson".to_string(),
            email: "  Sarah@BeautyShop.com ".to_string(),
            role: Role::Employee,
            password: "emp123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_normalizes_email_and_hashes() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db.users().insert(&sarah()).await.unwrap();
        assert_eq!(user.email, "sarah@beautyshop.com");

        let creds = db
            .users()
            .find_credentials("SARAH@beautyshop.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(creds.user, user);
        assert_ne!(creds.password_hash, "emp123");
        assert!(verify_password("emp123", &creds.password_hash));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users().insert(&sarah()).await.unwrap();

        let err = db.users().insert(&sarah()).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(db.users().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_password_and_role() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db.users().insert(&sarah()).await.unwrap();
        assert_eq!(db.users().count_admins().await.unwrap(), 0);

        let patch = UserPatch {
            role: Some(Role::Admin),
            password: Some("newpass1".to_string()),
            ..Default::default()
        };
        let updated = db.users().update(&user.id, &patch).await.unwrap();
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(db.users().count_admins().await.unwrap(), 1);

        let creds = db
            .users()
            .find_credentials(&user.email)
            .await
            .unwrap()
            .unwrap();
        assert!(verify_password("newpass1", &creds.password_hash));
        assert!(!verify_password("emp123", &creds.password_hash));
    }

    #[tokio::test]
    async fn test_update_email_collision() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let sarah = db.users().insert(&sarah()).await.unwrap();
        let mut other = self::sarah();
        other.email = "mia@beautyshop.com".to_string();
        let mia = db.users().insert(&other).await.unwrap();

        let patch = UserPatch {
            email: Some(sarah.email.clone()),
            ..Default::default()
        };
        let err = db.users().update(&mia.id, &patch).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // Keeping one's own email is not a collision
        let own = UserPatch {
            email: Some(sarah.email.to_uppercase()),
            ..Default::default()
        };
        assert!(db.users().update(&sarah.id, &own).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.users().delete("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
