//! # Session Repository
//!
//! Opaque login tokens with an expiry.
//!
//! ```text
//! login ──► create(user, ttl) ──► INSERT sessions (token, user_id, expires_at)
//!
//! command ──► find_active(token, now)
//!               │
//!               ├── no row / profile gone ──► None
//!               ├── expires_at <= now    ──► None
//!               └── otherwise            ──► Session { user: current profile }
//! ```
//!
//! Deleting a profile cascades to its sessions.

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbResult;
use beauty_core::{Session, User};

#[derive(sqlx::FromRow)]
struct SessionRow {
    token: String,
    session_created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    #[sqlx(flatten)]
    user: User,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            token: row.token,
            user: row.user,
            created_at: row.session_created_at,
            expires_at: row.expires_at,
        }
    }
}

/// Repository for session database operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Creates a new SessionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SessionRepository { pool }
    }

    /// Opens a session for `user` that lasts `ttl` from `now`.
    pub async fn create(&self, user: &User, ttl: Duration, now: DateTime<Utc>) -> DbResult<Session> {
        let session = Session {
            token: Uuid::new_v4().to_string(),
            user: user.clone(),
            created_at: now,
            expires_at: now + ttl,
        };

        sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.token)
        .bind(&user.id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;

        debug!(user_id = %user.id, expires_at = %session.expires_at, "Session created");
        Ok(session)
    }

    /// Resolves a token to a live session carrying the current profile.
    pub async fn find_active(&self, token: &str, now: DateTime<Utc>) -> DbResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT s.token, s.created_at AS session_created_at, s.expires_at,
                   p.id, p.name, p.email, p.role, p.created_at
            FROM sessions s
            JOIN profiles p ON p.id = s.user_id
            WHERE s.token = ?
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Session::from).filter(|s| !s.is_expired(now)))
    }

    /// Ends a session. Unknown tokens are ignored.
    pub async fn delete(&self, token: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Removes every session expired at `now`. Returns how many went.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> DbResult<u64> {
        let removed = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if removed > 0 {
            info!(removed, "Expired sessions purged");
        }
        Ok(removed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use beauty_core::{NewUser, Role};

    async fn setup() -> (Database, User) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db
            .users()
            .insert(&NewUser {
                name: "Admin User".to_string(),
                email: "admin@beautyshop.com".to_string(),
                role: Role::Admin,
                password: "admin123".to_string(),
            })
            .await
            .unwrap();
        (db, user)
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let (db, user) = setup().await;
        let now = Utc::now();
        let session = db.sessions().create(&user, Duration::hours(12), now).await.unwrap();

        let found = db
            .sessions()
            .find_active(&session.token, now + Duration::hours(1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.user, user);
        assert_eq!(found.token, session.token);
    }

    #[tokio::test]
    async fn test_expired_session_is_not_active() {
        let (db, user) = setup().await;
        let now = Utc::now();
        let session = db.sessions().create(&user, Duration::hours(1), now).await.unwrap();

        let later = now + Duration::hours(1);
        assert!(db.sessions().find_active(&session.token, later).await.unwrap().is_none());
        assert_eq!(db.sessions().delete_expired(later).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_logout_and_cascade() {
        let (db, user) = setup().await;
        let now = Utc::now();
        let a = db.sessions().create(&user, Duration::hours(1), now).await.unwrap();
        let b = db.sessions().create(&user, Duration::hours(1), now).await.unwrap();

        db.sessions().delete(&a.token).await.unwrap();
        assert!(db.sessions().find_active(&a.token, now).await.unwrap().is_none());

        db.users().delete(&user.id).await.unwrap();
        assert!(db.sessions().find_active(&b.token, now).await.unwrap().is_none());
    }
}
