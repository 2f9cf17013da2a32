//! Session Store
//!
//! Persists the bearer token and the cached user profile between runs and
//! gates access to the dashboard.

mod error;
mod storage;
mod store;

pub use error::{SessionError, SessionResult};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{Role, Session, SessionStore, User, TOKEN_KEY, USER_KEY};
