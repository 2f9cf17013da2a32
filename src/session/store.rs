//! Session store
//!
//! Holds the bearer token and the cached user profile under the `token` and
//! `user` keys. Both keys are always written and removed together.

use serde::{Deserialize, Serialize};

use super::error::{SessionError, SessionResult};
use super::storage::KeyValueStorage;

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "token";

/// Storage key for the serialized user profile
pub const USER_KEY: &str = "user";

/// Account role as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The backend calls students plain "user"
    #[serde(alias = "user")]
    Student,
    Teacher,
    #[serde(other)]
    Other,
}

impl Role {
    pub fn is_student(self) -> bool {
        self == Role::Student
    }

    pub fn is_teacher(self) -> bool {
        self == Role::Teacher
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Other => "other",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cached profile of the logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

/// Proof of authentication plus the cached profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

/// Reads and writes the session in a [`KeyValueStorage`]
pub struct SessionStore<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the stored session
    ///
    /// A half-written or unreadable session is cleared and reported as
    /// [`SessionError::Unauthenticated`].
    pub fn load(&mut self) -> SessionResult<Session> {
        let token = self.storage.get_item(TOKEN_KEY)?;
        let user = self.storage.get_item(USER_KEY)?;

        match (token, user) {
            (Some(token), Some(user)) if !token.is_empty() => {
                match serde_json::from_str::<User>(&user) {
                    Ok(user) => Ok(Session { token, user }),
                    Err(e) => {
                        tracing::warn!("Discarding unreadable stored user profile: {}", e);
                        self.clear()?;
                        Err(SessionError::Unauthenticated)
                    }
                }
            }
            (None, None) => Err(SessionError::Unauthenticated),
            _ => {
                tracing::warn!("Discarding incomplete stored session");
                self.clear()?;
                Err(SessionError::Unauthenticated)
            }
        }
    }

    /// Persist token and user in one write
    pub fn save(&mut self, session: &Session) -> SessionResult<()> {
        let user = serde_json::to_string(&session.user)?;
        self.storage
            .set_items(&[(TOKEN_KEY, session.token.clone()), (USER_KEY, user)])?;
        tracing::info!(user_id = session.user.id, "Session saved");
        Ok(())
    }

    /// Remove token and user in one step
    pub fn clear(&mut self) -> SessionResult<()> {
        self.storage.remove_items(&[TOKEN_KEY, USER_KEY])?;
        tracing::info!("Session cleared");
        Ok(())
    }
}
