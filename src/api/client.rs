//! Backend API Client
//!
//! Thin gateway over a [`Transport`]: adds the bearer token, turns non-2xx
//! responses into [`ClientError::Api`] and decodes typed endpoint results.
//! No retries, no caching, no deduplication of in-flight calls.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::dto::*;
use super::error::{ClientError, ClientResult};
use super::transport::{ApiRequest, Method, Transport};

/// Authenticated/unauthenticated JSON gateway to the backend
pub struct ApiClient<T: Transport> {
    transport: T,
    token: Option<String>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issue one request and return the JSON body of a 2xx response
    ///
    /// The `Authorization: Bearer` header is sent only when `authenticated`
    /// is set and a token is present.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        authenticated: bool,
    ) -> ClientResult<Value> {
        let bearer = if authenticated {
            self.token.clone()
        } else {
            None
        };

        let response = self
            .transport
            .send(ApiRequest {
                method,
                path: path.to_string(),
                body,
                bearer,
            })
            .await?;

        if response.is_success() {
            Ok(response.body)
        } else {
            let err = ClientError::from_response(response.status, &response.body);
            tracing::debug!(%method, path, "Backend rejected request: {}", err);
            Err(err)
        }
    }

    async fn get<R: DeserializeOwned>(&self, path: &str, authenticated: bool) -> ClientResult<R> {
        let body = self.request(Method::Get, path, None, authenticated).await?;
        decode(body)
    }

    async fn send_json<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        authenticated: bool,
    ) -> ClientResult<R> {
        let body = serde_json::to_value(body)?;
        let response = self.request(method, path, Some(body), authenticated).await?;
        decode(response)
    }

    // ============ Auth ============

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_json(Method::Post, "/auth/login", &body, false).await
    }

    pub async fn signup(&self, request: &SignupRequest) -> ClientResult<SignupResponse> {
        self.send_json(Method::Post, "/auth/signup", request, false)
            .await
    }

    /// Directory of all users (id and email)
    pub async fn list_users(&self) -> ClientResult<Option<Vec<UserRecord>>> {
        let envelope: UsersEnvelope = self.get("/auth/users", false).await?;
        Ok(envelope.users)
    }

    // ============ Courses ============

    pub async fn list_courses(&self) -> ClientResult<Option<Vec<Course>>> {
        let envelope: CoursesEnvelope<Course> = self.get("/courses", false).await?;
        Ok(envelope.courses)
    }

    pub async fn create_course(&self, request: &CreateCourseRequest) -> ClientResult<Value> {
        self.send_json(Method::Post, "/courses", request, true).await
    }

    pub async fn update_course_capacity(&self, course_id: i64, capacity: i64) -> ClientResult<Value> {
        let body = UpdateCourseRequest { capacity };
        self.send_json(Method::Put, &format!("/courses/{}", course_id), &body, true)
            .await
    }

    pub async fn delete_course(&self, course_id: i64) -> ClientResult<Value> {
        self.request(Method::Delete, &format!("/courses/{}", course_id), None, true)
            .await
    }

    // ============ Enrolments ============

    pub async fn my_enrolled_courses(&self) -> ClientResult<Option<Vec<EnrolledCourse>>> {
        let envelope: CoursesEnvelope<EnrolledCourse> =
            self.get("/enrolments/students/me/courses", true).await?;
        Ok(envelope.courses)
    }

    pub async fn course_students(&self, course_id: i64) -> ClientResult<Option<Vec<EnrolledStudent>>> {
        let envelope: StudentsEnvelope = self
            .get(&format!("/enrolments/courses/{}/students", course_id), true)
            .await?;
        Ok(envelope.students)
    }

    pub async fn enroll(&self, course_id: i64, request: &EnrollRequest) -> ClientResult<Value> {
        self.send_json(
            Method::Post,
            &format!("/enrolments/courses/{}/enrollments", course_id),
            request,
            true,
        )
        .await
    }

    pub async fn remove_student(&self, course_id: i64, student_id: i64) -> ClientResult<Value> {
        self.request(
            Method::Delete,
            &format!("/enrolments/courses/{}/students/{}", course_id, student_id),
            None,
            true,
        )
        .await
    }

    // ============ Grades ============

    pub async fn my_grades(&self) -> ClientResult<Option<Vec<Grade>>> {
        let envelope: GradesEnvelope = self.get("/grades/students/me/grades", true).await?;
        Ok(envelope.grades)
    }

    pub async fn course_grades(&self, course_id: i64) -> ClientResult<Option<Vec<Grade>>> {
        let envelope: GradesEnvelope = self
            .get(&format!("/grades/courses/{}/grades", course_id), false)
            .await?;
        Ok(envelope.grades)
    }

    /// Grade records with their ids, used to decide between create and update
    pub async fn grade_lookup(&self, course_id: i64) -> ClientResult<Vec<Grade>> {
        let envelope: GradesEnvelope = self
            .get(&format!("/grades/courses/{}", course_id), false)
            .await?;
        Ok(envelope.grades.unwrap_or_default())
    }

    pub async fn create_grade(&self, request: &CreateGradeRequest) -> ClientResult<Value> {
        self.send_json(Method::Post, "/grades", request, true).await
    }

    pub async fn update_grade(&self, grade_id: i64, value: &str) -> ClientResult<Value> {
        let body = UpdateGradeRequest {
            value: value.to_string(),
        };
        self.send_json(Method::Put, &format!("/grades/{}", grade_id), &body, true)
            .await
    }

    // ============ Messages ============

    pub async fn my_messages(&self) -> ClientResult<Option<Vec<MessageThread>>> {
        let envelope: MessagesEnvelope = self.get("/messages/me", true).await?;
        Ok(envelope.messages)
    }

    pub async fn send_message(&self, request: &SendMessageRequest) -> ClientResult<Value> {
        self.send_json(Method::Post, "/messages", request, true).await
    }
}

/// Decode a success body; `null` decodes like `{}`
fn decode<R: DeserializeOwned>(body: Value) -> ClientResult<R> {
    let body = if body.is_null() {
        Value::Object(Default::default())
    } else {
        body
    };
    serde_json::from_value(body).map_err(ClientError::from)
}
