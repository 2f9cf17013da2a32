//! Data Transfer Objects
//!
//! Wire types for the backend. Field names follow the backend's upper-case
//! column names and must not change.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::session::User;

// ============================================
// AUTH DTOs
// ============================================

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login: token plus profile
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Successful signup; the backend sends no profile
#[derive(Debug, Clone, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Entry of the user directory
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "USER_ID")]
    pub user_id: i64,
    #[serde(rename = "EMAIL")]
    pub email: String,
}

// ============================================
// COURSE DTOs
// ============================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Course {
    #[serde(rename = "COURSE_ID")]
    pub course_id: i64,
    #[serde(rename = "COURSE_NAME")]
    pub course_name: String,
    #[serde(rename = "CAPACITY", default)]
    pub capacity: Option<i64>,
    /// Owning teacher
    #[serde(rename = "USER_ID")]
    pub owner_id: i64,
}

#[derive(Debug, Serialize)]
pub struct CreateCourseRequest {
    #[serde(rename = "COURSE_NAME")]
    pub course_name: String,
    #[serde(rename = "USER_ID")]
    pub owner_id: i64,
    #[serde(rename = "CAPACITY")]
    pub capacity: i64,
}

#[derive(Debug, Serialize)]
pub struct UpdateCourseRequest {
    #[serde(rename = "CAPACITY")]
    pub capacity: i64,
}

// ============================================
// ENROLLMENT DTOs
// ============================================

/// A course the current student is enrolled in
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnrolledCourse {
    #[serde(rename = "COURSE_ID")]
    pub course_id: i64,
    #[serde(rename = "EMAIL", default)]
    pub email: Option<String>,
}

/// A student on a course roster
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnrolledStudent {
    #[serde(rename = "STUDENT_ID")]
    pub student_id: i64,
    #[serde(rename = "EMAIL", default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EnrollRequest {
    #[serde(rename = "STUDENT_ID")]
    pub student_id: i64,
    #[serde(rename = "EMAIL")]
    pub email: String,
}

// ============================================
// GRADE DTOs
// ============================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Grade {
    /// Only present on the lookup endpoint
    #[serde(rename = "GRADE_ID", default)]
    pub grade_id: Option<i64>,
    #[serde(rename = "STUDENT_ID", default)]
    pub student_id: Option<i64>,
    #[serde(rename = "COURSE_ID", default)]
    pub course_id: Option<i64>,
    #[serde(rename = "GRADE_VALUE", default, deserialize_with = "string_or_number")]
    pub value: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateGradeRequest {
    #[serde(rename = "STUDENT_ID")]
    pub student_id: i64,
    #[serde(rename = "COURSE_ID")]
    pub course_id: i64,
    #[serde(rename = "GRADE_VALUE")]
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateGradeRequest {
    #[serde(rename = "GRADE_VALUE")]
    pub value: String,
}

// ============================================
// MESSAGE DTOs
// ============================================

/// Separator between bodies inside `MESSAGES_HISTORY`
pub const HISTORY_SEPARATOR: &str = "|||";

/// One conversation thread between two users
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageThread {
    #[serde(rename = "FROM_USER_ID")]
    pub from_user_id: i64,
    #[serde(rename = "TO_USER_ID")]
    pub to_user_id: i64,
    #[serde(rename = "MESSAGES_HISTORY", default)]
    pub history: Option<String>,
}

impl MessageThread {
    /// Message bodies in chronological order
    pub fn entries(&self) -> Vec<&str> {
        match self.history.as_deref() {
            Some(history) if !history.is_empty() => history.split(HISTORY_SEPARATOR).collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest {
    #[serde(rename = "TO_USER_ID")]
    pub to_user_id: i64,
    #[serde(rename = "MESSAGE_TEXT")]
    pub text: String,
}

// ============================================
// COLLECTION ENVELOPES
// ============================================

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UsersEnvelope {
    #[serde(default)]
    pub users: Option<Vec<UserRecord>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CoursesEnvelope<T> {
    #[serde(default = "Option::default")]
    pub courses: Option<Vec<T>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StudentsEnvelope {
    #[serde(default)]
    pub students: Option<Vec<EnrolledStudent>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GradesEnvelope {
    #[serde(default)]
    pub grades: Option<Vec<Grade>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MessagesEnvelope {
    #[serde(default)]
    pub messages: Option<Vec<MessageThread>>,
}

/// Accept `"A"`, `92`, `92.5` or `null` for a grade value
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}
