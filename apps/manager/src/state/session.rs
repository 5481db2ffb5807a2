//! # Session Guard
//!
//! Every command starts here.
//!
//! ```text
//! command(db, session, ...)
//!      │
//!      ▼
//! require(db, session, Action::X)
//!      │  ├── token unknown / expired / profile deleted → SessionExpired
//!      │  └── role may not do X                         → Forbidden
//!      ▼
//! fresh Session (current name and role from the store)
//! ```
//!
//! The role is re-read on every call, so a demotion takes effect on the next
//! command rather than at the next login.

use chrono::Utc;
use tracing::debug;

use crate::error::ApiError;
use crate::state::DbState;
use beauty_core::{authorize, Action, CoreError, Session};

/// Resolves `session` against the store and checks `action` for its role.
pub async fn require(db: &DbState, session: &Session, action: Action) -> Result<Session, ApiError> {
    let current = db
        .inner()
        .sessions()
        .find_active(&session.token, Utc::now())
        .await?
        .ok_or(CoreError::SessionExpired)?;

    authorize(current.role(), action)?;

    debug!(user_id = %current.user.id, ?action, "Session authorized");
    Ok(current)
}
