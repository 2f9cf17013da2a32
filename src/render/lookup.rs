//! Id-to-label resolution for cross-referencing renderers

use std::collections::HashMap;

use crate::api::dto::{Course, UserRecord};

/// Maps numeric ids to display labels
///
/// Ids without an entry resolve to the id itself, so an empty map (a failed
/// secondary fetch) still renders every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelMap {
    labels: HashMap<i64, String>,
}

impl LabelMap {
    /// Map that resolves nothing
    pub fn unresolved() -> Self {
        Self::default()
    }

    /// user id -> email
    pub fn from_users(users: &[UserRecord]) -> Self {
        users
            .iter()
            .map(|u| (u.user_id, u.email.clone()))
            .collect()
    }

    /// course id -> course name
    pub fn from_courses(courses: &[Course]) -> Self {
        courses
            .iter()
            .map(|c| (c.course_id, c.course_name.clone()))
            .collect()
    }

    pub fn get(&self, id: i64) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    /// Label for `id`, or the raw id
    pub fn resolve(&self, id: i64) -> String {
        self.get(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl FromIterator<(i64, String)> for LabelMap {
    fn from_iter<I: IntoIterator<Item = (i64, String)>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}
