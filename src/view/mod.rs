//! View State
//!
//! Section and tab switching for the dashboard.

pub mod router;

pub use router::{LoadAction, RouteError, Section, SelectedCourse, Tab, ViewRouter};
