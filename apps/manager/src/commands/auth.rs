//! # Auth Commands
//!
//! Sign in, sign out, and resolve who is signed in.
//!
//! ## Login Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login("Admin@BeautyShop.com", "admin123")                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  find_credentials(email)   ← trimmed, case-insensitive                  │
//! │       │                                                                 │
//! │       ├── no profile      ──► InvalidCredentials                        │
//! │       ▼                                                                 │
//! │  verify_password(argon2)                                                │
//! │       │                                                                 │
//! │       ├── mismatch        ──► InvalidCredentials (same message)         │
//! │       ▼                                                                 │
//! │  sessions.create(user, ttl) ──► Session { token, user, expires_at }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{DbState, ManagerConfig};
use beauty_core::{CoreError, Session, User};
use beauty_db::password::verify_password;

/// Signs in with email and password.
///
/// Expired sessions are purged on the way in.
pub async fn login(
    db: &DbState,
    config: &ManagerConfig,
    email: &str,
    password: &str,
) -> Result<Session, ApiError> {
    debug!(email = %email.trim(), "login command");
    let now = Utc::now();

    db.inner().sessions().delete_expired(now).await?;

    let creds = db
        .inner()
        .users()
        .find_credentials(email)
        .await?
        .ok_or(CoreError::InvalidCredentials)?;

    if !verify_password(password, &creds.password_hash) {
        info!(user_id = %creds.user.id, "Login rejected");
        return Err(CoreError::InvalidCredentials.into());
    }

    let session = db
        .inner()
        .sessions()
        .create(&creds.user, config.session_ttl(), now)
        .await?;

    info!(user_id = %session.user.id, role = %session.role(), "Signed in");
    Ok(session)
}

/// Signs out. The token stops resolving immediately.
pub async fn logout(db: &DbState, session: &Session) -> Result<(), ApiError> {
    debug!(user_id = %session.user.id, "logout command");
    db.inner().sessions().delete(&session.token).await?;
    info!(user_id = %session.user.id, "Signed out");
    Ok(())
}

/// The user behind an unexpired token, if any.
pub async fn current_user(db: &DbState, token: &str) -> Result<Option<User>, ApiError> {
    let session = db.inner().sessions().find_active(token, Utc::now()).await?;
    Ok(session.map(|s| s.user))
}
