//! # Coursedesk
//!
//! Client for a small learning-management backend: students browse and
//! enroll in courses, see their grades and exchange messages; teachers create
//! and manage courses, rosters and grades.
//!
//! ## Modules
//!
//! - [`session`]: Persisted token and user profile
//! - [`api`]: REST gateway over a pluggable transport
//! - [`view`]: Section/tab state machine
//! - [`render`]: Collections to view fragments
//! - [`dashboard`]: Load paths and mutation handlers tying it all together
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coursedesk::api::{ApiClient, HttpTransport, HttpTransportConfig};
//! use coursedesk::dashboard::{Dashboard, Panel, RecordingNotifier};
//! use coursedesk::session::{FileStorage, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(HttpTransport::new(HttpTransportConfig::default())?);
//!     let store = SessionStore::new(FileStorage::new("session.json"));
//!
//!     // Fails with `Unauthenticated` when nobody is logged in
//!     let dashboard = Dashboard::open(client, store, RecordingNotifier::default()).await?;
//!
//!     if let Some(catalog) = dashboard.screen().panel(Panel::CourseCatalog) {
//!         println!("{}", catalog);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod render;
pub mod session;
pub mod view;

// Re-export top-level types for convenience
pub use api::{ApiClient, ClientError, ClientResult, HttpTransport, HttpTransportConfig, Transport};

pub use config::{Config, ConfigError};

pub use dashboard::{
    Dashboard, DashboardError, DashboardResult, Notice, NoticeLevel, Notifier, Outcome, Panel,
    Screen,
};

pub use render::{Fragment, LabelMap};

pub use session::{FileStorage, KeyValueStorage, Role, Session, SessionError, SessionStore, User};

pub use view::{LoadAction, RouteError, Section, Tab, ViewRouter};
