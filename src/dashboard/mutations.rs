//! Mutation handlers
//!
//! Every handler validates its form before touching the network, issues the
//! call(s), and on success resets the form, notifies, and re-runs the load
//! path it affected. Failures end at the notifier; nothing is retried.

use tracing::{info, warn};

use super::{Dashboard, DashboardError, DashboardResult, Notice, Notifier, Panel};
use crate::api::dto::{CreateCourseRequest, CreateGradeRequest, EnrollRequest, SendMessageRequest};
use crate::api::{ClientError, Transport};
use crate::session::KeyValueStorage;
use crate::view::{LoadAction, RouteError, Section};

const FILL_ALL_FIELDS: &str = "Please fill in all fields";

/// How a handler ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The backend accepted the change
    Applied,
    /// Rejected before any network call
    Invalid,
    /// The user declined the confirmation
    Cancelled,
    /// The backend or the network refused
    Failed,
}

/// Compose tab of the messaging section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageForm {
    pub recipient_id: String,
    pub text: String,
}

impl MessageForm {
    fn validate(&self) -> DashboardResult<SendMessageRequest> {
        if self.recipient_id.trim().is_empty() || self.text.is_empty() {
            return Err(DashboardError::validation(FILL_ALL_FIELDS));
        }
        Ok(SendMessageRequest {
            to_user_id: parse_id(&self.recipient_id, "Recipient ID")?,
            text: self.text.clone(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateCourseForm {
    pub name: String,
    pub capacity: String,
}

impl CreateCourseForm {
    fn validate(&self, owner_id: i64) -> DashboardResult<CreateCourseRequest> {
        let name = self.name.trim();
        if name.is_empty() || self.capacity.trim().is_empty() {
            return Err(DashboardError::validation(FILL_ALL_FIELDS));
        }
        Ok(CreateCourseRequest {
            course_name: name.to_string(),
            owner_id,
            capacity: parse_capacity(&self.capacity)?,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// New capacity for the managed course
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapacityForm {
    pub capacity: String,
}

impl CapacityForm {
    fn validate(&self) -> DashboardResult<i64> {
        if self.capacity.trim().is_empty() {
            return Err(DashboardError::validation(FILL_ALL_FIELDS));
        }
        parse_capacity(&self.capacity)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GradeForm {
    pub student_id: String,
    pub value: String,
}

impl GradeForm {
    fn validate(&self) -> DashboardResult<(i64, String)> {
        let value = self.value.trim();
        if self.student_id.trim().is_empty() || value.is_empty() {
            return Err(DashboardError::validation(FILL_ALL_FIELDS));
        }
        Ok((parse_id(&self.student_id, "Student ID")?, value.to_string()))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn parse_id(raw: &str, field: &str) -> DashboardResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| DashboardError::validation(format!("{} must be a number", field)))
}

fn parse_capacity(raw: &str) -> DashboardResult<i64> {
    match raw.trim().parse::<i64>() {
        Ok(capacity) if capacity > 0 => Ok(capacity),
        _ => Err(DashboardError::validation("Capacity must be a positive number")),
    }
}

impl<T: Transport, S: KeyValueStorage, N: Notifier> Dashboard<T, S, N> {
    /// Enroll the current student in `course_id`
    pub async fn enroll(&mut self, course_id: i64) -> Outcome {
        if !self.user.role.is_student() {
            return self.rejected(DashboardError::validation("Only students can enroll in courses"));
        }

        let request = EnrollRequest {
            student_id: self.user.id,
            email: self.user.email.clone(),
        };

        match self.client.enroll(course_id, &request).await {
            Ok(_) => {
                info!(course_id, student_id = self.user.id, "Enrolled in course");
                self.notifier.notify(Notice::success("Enrolled successfully!"));
                let loads = self.router.course_loads();
                self.run(loads).await;
                Outcome::Applied
            }
            Err(e) => self.failed(e, "Enrollment failed", "Error enrolling in course"),
        }
    }

    pub async fn send_message(&mut self, form: &mut MessageForm) -> Outcome {
        let request = match form.validate() {
            Ok(request) => request,
            Err(e) => return self.rejected(e),
        };

        match self.client.send_message(&request).await {
            Ok(_) => {
                info!(to = request.to_user_id, "Message sent");
                form.reset();
                self.notifier.notify(Notice::success("Message sent!"));
                self.run(vec![LoadAction::Messages]).await;
                Outcome::Applied
            }
            Err(e) => self.failed(e, "Failed to send message", "Error sending message"),
        }
    }

    /// Create a course owned by the current teacher
    pub async fn create_course(&mut self, form: &mut CreateCourseForm) -> Outcome {
        if !self.router.can_create_courses() {
            return self.rejected(RouteError::TeacherOnly.into());
        }
        let request = match form.validate(self.user.id) {
            Ok(request) => request,
            Err(e) => return self.rejected(e),
        };

        match self.client.create_course(&request).await {
            Ok(_) => {
                info!(name = %request.course_name, capacity = request.capacity, "Course created");
                form.reset();
                self.notifier
                    .notify(Notice::success("Course created successfully!"));
                let loads = self.router.course_loads();
                self.run(loads).await;
                Outcome::Applied
            }
            Err(e) => self.failed(e, "Failed to create course", "Error creating course"),
        }
    }

    /// Change the capacity of the selected course
    pub async fn update_capacity(&mut self, form: &mut CapacityForm) -> Outcome {
        let course_id = match self.selected_course_id() {
            Ok(id) => id,
            Err(e) => return self.rejected(e),
        };
        let capacity = match form.validate() {
            Ok(capacity) => capacity,
            Err(e) => return self.rejected(e),
        };

        match self.client.update_course_capacity(course_id, capacity).await {
            Ok(_) => {
                info!(course_id, capacity, "Course capacity updated");
                form.reset();
                self.notifier
                    .notify(Notice::success("Course updated successfully!"));
                let loads = self.router.course_loads();
                self.run(loads).await;
                Outcome::Applied
            }
            Err(e) => self.failed(e, "Failed to update course", "Error updating course"),
        }
    }

    /// Delete the selected course after confirmation, then return to courses
    pub async fn delete_course(&mut self) -> Outcome {
        let course_id = match self.selected_course_id() {
            Ok(id) => id,
            Err(e) => return self.rejected(e),
        };
        if !self
            .notifier
            .confirm("Are you sure you want to delete this course?")
        {
            return Outcome::Cancelled;
        }

        match self.client.delete_course(course_id).await {
            Ok(_) => {
                info!(course_id, "Course deleted");
                self.notifier
                    .notify(Notice::success("Course deleted successfully!"));

                self.router.clear_selection();
                self.screen.manage_title = None;
                self.screen.clear(Panel::Roster);
                self.screen.clear(Panel::CourseGrades);
                if let Ok(loads) = self.router.navigate(Section::Courses) {
                    self.run(loads).await;
                }
                Outcome::Applied
            }
            Err(e) => self.failed(e, "Failed to delete course", "Error deleting course"),
        }
    }

    /// Remove `student_id` from the selected course after confirmation
    pub async fn remove_student(&mut self, student_id: i64) -> Outcome {
        let course_id = match self.selected_course_id() {
            Ok(id) => id,
            Err(e) => return self.rejected(e),
        };
        if !self
            .notifier
            .confirm("Are you sure you want to remove this student?")
        {
            return Outcome::Cancelled;
        }

        match self.client.remove_student(course_id, student_id).await {
            Ok(_) => {
                info!(course_id, student_id, "Student removed");
                self.notifier
                    .notify(Notice::success("Student removed successfully!"));
                self.run(vec![
                    LoadAction::Roster(course_id),
                    LoadAction::CourseGrades(course_id),
                ])
                .await;
                Outcome::Applied
            }
            Err(e) => self.failed(e, "Failed to remove student", "Error removing student"),
        }
    }

    /// Create or update the grade of a student in the selected course
    ///
    /// The existing grades are looked up first; a record for the student is
    /// updated in place, otherwise a new one is created.
    pub async fn assign_grade(&mut self, form: &mut GradeForm) -> Outcome {
        let course_id = match self.selected_course_id() {
            Ok(id) => id,
            Err(e) => return self.rejected(e),
        };
        let (student_id, value) = match form.validate() {
            Ok(parsed) => parsed,
            Err(e) => return self.rejected(e),
        };

        match self.upsert_grade(course_id, student_id, value).await {
            Ok(()) => {
                form.reset();
                self.notifier
                    .notify(Notice::success("Grade assigned successfully!"));
                self.run(vec![LoadAction::CourseGrades(course_id)]).await;
                Outcome::Applied
            }
            Err(e) => self.failed(e, "Failed to assign grade", "Error assigning grade"),
        }
    }

    async fn upsert_grade(&self, course_id: i64, student_id: i64, value: String) -> Result<(), ClientError> {
        let existing = self
            .client
            .grade_lookup(course_id)
            .await?
            .into_iter()
            .find(|grade| grade.student_id == Some(student_id));

        match existing {
            Some(grade) => {
                let grade_id = grade.grade_id.ok_or_else(|| {
                    ClientError::Decode(format!("grade of student {} has no GRADE_ID", student_id))
                })?;
                self.client.update_grade(grade_id, &value).await?;
                info!(course_id, student_id, grade_id, "Grade updated");
            }
            None => {
                self.client
                    .create_grade(&CreateGradeRequest {
                        student_id,
                        course_id,
                        value,
                    })
                    .await?;
                info!(course_id, student_id, "Grade created");
            }
        }
        Ok(())
    }

    fn selected_course_id(&self) -> DashboardResult<i64> {
        self.router
            .selected_course()
            .map(|course| course.id)
            .ok_or(DashboardError::NoCourseSelected)
    }

    fn rejected(&self, err: DashboardError) -> Outcome {
        self.notifier.notify(Notice::warning(err.to_string()));
        Outcome::Invalid
    }

    fn failed(&self, err: ClientError, fallback: &str, network_fallback: &str) -> Outcome {
        warn!("{}: {}", fallback, err);
        self.notifier
            .notify(Notice::error(err.user_message(fallback, network_fallback)));
        Outcome::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::api::fake::FakeTransport;
    use crate::api::Method;
    use crate::session::Role;
    use serde_json::json;

    fn managed(transport: FakeTransport) -> TestDashboard {
        transport.respond(Method::Get, "/enrolments/courses/8/students", 200, json!({"students": []}));
        transport.respond(Method::Get, "/grades/courses/8/grades", 200, json!({"grades": []}));
        let mut dashboard = dashboard(transport, Role::Teacher, 4);
        dashboard.router.select_course(8, "History");
        dashboard
    }

    fn grade_form(student: &str, value: &str) -> GradeForm {
        GradeForm {
            student_id: student.to_string(),
            value: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_grade_upsert_creates_then_updates() {
        let transport = FakeTransport::new();
        transport.respond(Method::Get, "/grades/courses/8", 200, json!({"grades": []}));
        transport.respond(
            Method::Get,
            "/grades/courses/8",
            200,
            json!({"grades": [{"GRADE_ID": 55, "STUDENT_ID": 3, "COURSE_ID": 8, "GRADE_VALUE": "B"}]}),
        );
        transport.respond(Method::Post, "/grades", 201, json!({"message": "created"}));
        transport.respond(Method::Put, "/grades/55", 200, json!({"message": "updated"}));
        let mut dashboard = managed(transport);

        let mut form = grade_form("3", "B");
        assert_eq!(dashboard.assign_grade(&mut form).await, Outcome::Applied);
        assert_eq!(form, GradeForm::default());

        let mut form = grade_form("3", "A");
        assert_eq!(dashboard.assign_grade(&mut form).await, Outcome::Applied);

        let transport = dashboard.client().transport();
        assert_eq!(transport.count(Method::Get, "/grades/courses/8"), 2);
        assert_eq!(transport.count(Method::Post, "/grades"), 1);
        assert_eq!(transport.count(Method::Put, "/grades/55"), 1);

        let put = transport
            .requests()
            .into_iter()
            .find(|r| r.method == Method::Put)
            .unwrap();
        assert_eq!(put.body, Some(json!({"GRADE_VALUE": "A"})));
        assert_eq!(
            dashboard.notifier().notices().last(),
            Some(&Notice::success("Grade assigned successfully!"))
        );
    }

    #[tokio::test]
    async fn test_grade_record_without_id_fails() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Get,
            "/grades/courses/8",
            200,
            json!({"grades": [{"STUDENT_ID": 3, "GRADE_VALUE": "B"}]}),
        );
        let mut dashboard = managed(transport);

        let outcome = dashboard.assign_grade(&mut grade_form("3", "A")).await;
        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(dashboard.client().transport().count(Method::Post, "/grades"), 0);
        assert_eq!(
            dashboard.notifier().last(),
            Some(Notice::error("Error assigning grade"))
        );
    }

    #[tokio::test]
    async fn test_assign_grade_requires_selection() {
        let mut dashboard = dashboard(FakeTransport::new(), Role::Teacher, 4);

        let outcome = dashboard.assign_grade(&mut grade_form("3", "A")).await;
        assert_eq!(outcome, Outcome::Invalid);
        assert!(dashboard.client().transport().requests().is_empty());
        assert_eq!(
            dashboard.notifier().last(),
            Some(Notice::warning("Please select a course first"))
        );
    }

    #[tokio::test]
    async fn test_delete_without_selection_makes_no_call() {
        let mut dashboard = dashboard(FakeTransport::new(), Role::Teacher, 4);

        assert_eq!(dashboard.delete_course().await, Outcome::Invalid);
        assert!(dashboard.client().transport().requests().is_empty());
        assert!(dashboard.notifier().prompts().is_empty());
        assert_eq!(
            dashboard.notifier().last(),
            Some(Notice::warning("Please select a course first"))
        );
    }

    #[tokio::test]
    async fn test_declined_confirmation_is_noop() {
        let transport = FakeTransport::new();
        let mut dashboard = declining_dashboard(transport, Role::Teacher, 4);
        dashboard.router.select_course(8, "History");

        assert_eq!(dashboard.delete_course().await, Outcome::Cancelled);
        assert_eq!(dashboard.remove_student(3).await, Outcome::Cancelled);
        assert!(dashboard.client().transport().requests().is_empty());
        assert_eq!(dashboard.notifier().prompts().len(), 2);
        assert!(dashboard.router().selected_course().is_some());
    }

    #[tokio::test]
    async fn test_delete_returns_to_courses() {
        let transport = FakeTransport::new();
        transport.respond(Method::Delete, "/courses/8", 200, json!({"message": "deleted"}));
        transport.respond(Method::Get, "/courses", 200, json!({"courses": []}));
        transport.respond(Method::Get, "/auth/users", 200, json!({"users": []}));
        let mut dashboard = managed(transport);
        dashboard.select_course(8, "History").await;

        assert_eq!(dashboard.delete_course().await, Outcome::Applied);
        assert_eq!(dashboard.router().section(), Section::Courses);
        assert!(dashboard.router().selected_course().is_none());
        assert!(dashboard.screen().manage_title.is_none());
        assert!(dashboard.screen().panel(Panel::Roster).is_none());
        assert_eq!(
            dashboard.screen().panel(Panel::TeacherCourses).unwrap().placeholder(),
            Some(crate::render::NO_TEACHER_COURSES)
        );
    }

    #[tokio::test]
    async fn test_remove_student_reloads_roster() {
        let transport = FakeTransport::new();
        transport.respond(Method::Delete, "/enrolments/courses/8/students/3", 200, json!({}));
        let mut dashboard = managed(transport);

        assert_eq!(dashboard.remove_student(3).await, Outcome::Applied);
        let transport = dashboard.client().transport();
        assert_eq!(transport.count(Method::Get, "/enrolments/courses/8/students"), 1);
        assert_eq!(transport.count(Method::Get, "/grades/courses/8/grades"), 1);
        assert_eq!(
            dashboard.screen().panel(Panel::Roster).unwrap().placeholder(),
            Some(crate::render::NO_STUDENTS)
        );
    }

    #[tokio::test]
    async fn test_send_message_validates_before_network() {
        let mut dashboard = dashboard(FakeTransport::new(), Role::Student, 3);

        let mut form = MessageForm {
            recipient_id: String::new(),
            text: "hello".to_string(),
        };
        assert_eq!(dashboard.send_message(&mut form).await, Outcome::Invalid);
        assert_eq!(dashboard.notifier().last(), Some(Notice::warning(FILL_ALL_FIELDS)));

        form.recipient_id = "abc".to_string();
        assert_eq!(dashboard.send_message(&mut form).await, Outcome::Invalid);
        assert_eq!(
            dashboard.notifier().last(),
            Some(Notice::warning("Recipient ID must be a number"))
        );
        assert!(dashboard.client().transport().requests().is_empty());
        assert_eq!(form.text, "hello");
    }

    #[tokio::test]
    async fn test_send_message_resets_and_reloads() {
        let transport = FakeTransport::new();
        transport.respond(Method::Post, "/messages", 201, json!({"message": "sent"}));
        transport.respond(Method::Get, "/messages/me", 200, json!({"messages": []}));
        transport.respond(Method::Get, "/auth/users", 200, json!({"users": []}));
        let mut dashboard = dashboard(transport, Role::Student, 3);

        let mut form = MessageForm {
            recipient_id: "4".to_string(),
            text: "hello".to_string(),
        };
        assert_eq!(dashboard.send_message(&mut form).await, Outcome::Applied);
        assert_eq!(form, MessageForm::default());

        let requests = dashboard.client().transport().requests();
        assert_eq!(
            requests[0].body,
            Some(json!({"TO_USER_ID": 4, "MESSAGE_TEXT": "hello"}))
        );
        assert_eq!(requests[1].path, "/messages/me");
        assert_eq!(
            dashboard.screen().panel(Panel::Messages).unwrap().placeholder(),
            Some(crate::render::NO_MESSAGES)
        );
    }

    #[tokio::test]
    async fn test_enroll_surfaces_server_message() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/enrolments/courses/2/enrollments",
            400,
            json!({"error": "Course is full"}),
        );
        let mut dashboard = dashboard(transport, Role::Student, 3);

        assert_eq!(dashboard.enroll(2).await, Outcome::Failed);
        assert_eq!(dashboard.notifier().last(), Some(Notice::error("Course is full")));
        assert_eq!(
            dashboard.client().transport().requests()[0].body,
            Some(json!({"STUDENT_ID": 3, "EMAIL": "user3@school.test"}))
        );
    }

    #[tokio::test]
    async fn test_enroll_reloads_both_course_lists() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Post,
            "/enrolments/courses/2/enrollments",
            201,
            json!({"message": "enrolled"}),
        );
        transport.respond(
            Method::Get,
            "/enrolments/students/me/courses",
            200,
            json!({"courses": [{"COURSE_ID": 2, "EMAIL": "user3@school.test"}]}),
        );
        transport.respond(
            Method::Get,
            "/courses",
            200,
            json!({"courses": [{"COURSE_ID": 2, "COURSE_NAME": "Biology", "CAPACITY": 20, "USER_ID": 4}]}),
        );
        let mut dashboard = dashboard(transport, Role::Student, 3);

        assert_eq!(dashboard.enroll(2).await, Outcome::Applied);
        assert_eq!(
            dashboard.notifier().notices()[0],
            Notice::success("Enrolled successfully!")
        );

        let transport = dashboard.client().transport();
        assert_eq!(transport.count(Method::Get, "/enrolments/students/me/courses"), 1);
        assert_eq!(transport.count(Method::Get, "/courses"), 1);

        let mine = dashboard.screen().panel(Panel::MyCourses).unwrap();
        assert_eq!(mine.cards()[0].title.as_deref(), Some("Course ID: 2"));
        assert!(dashboard.screen().panel(Panel::CourseCatalog).is_some());
    }

    #[tokio::test]
    async fn test_enroll_network_failure_uses_generic_message() {
        let transport = FakeTransport::new();
        transport.fail(Method::Post, "/enrolments/courses/2/enrollments");
        let mut dashboard = dashboard(transport, Role::Student, 3);

        assert_eq!(dashboard.enroll(2).await, Outcome::Failed);
        assert_eq!(
            dashboard.notifier().last(),
            Some(Notice::error("Error enrolling in course"))
        );
    }

    #[tokio::test]
    async fn test_create_course_is_teacher_only() {
        let mut dashboard = dashboard(FakeTransport::new(), Role::Student, 3);
        let mut form = CreateCourseForm {
            name: "Art".to_string(),
            capacity: "10".to_string(),
        };

        assert_eq!(dashboard.create_course(&mut form).await, Outcome::Invalid);
        assert_eq!(
            dashboard.notifier().last(),
            Some(Notice::warning("Only teachers can create courses"))
        );
        assert!(dashboard.client().transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_create_course_sends_owner() {
        let transport = FakeTransport::new();
        transport.respond(Method::Post, "/courses", 201, json!({"message": "ok"}));
        transport.respond(Method::Get, "/courses", 200, json!({"courses": []}));
        transport.respond(Method::Get, "/auth/users", 200, json!({"users": []}));
        let mut dashboard = dashboard(transport, Role::Teacher, 4);

        let mut form = CreateCourseForm {
            name: " Art ".to_string(),
            capacity: "0".to_string(),
        };
        assert_eq!(dashboard.create_course(&mut form).await, Outcome::Invalid);

        form.capacity = "12".to_string();
        assert_eq!(dashboard.create_course(&mut form).await, Outcome::Applied);
        assert_eq!(
            dashboard.client().transport().requests()[0].body,
            Some(json!({"COURSE_NAME": "Art", "USER_ID": 4, "CAPACITY": 12}))
        );
        assert_eq!(
            dashboard.notifier().notices().first(),
            Some(&Notice::warning("Capacity must be a positive number"))
        );
    }

    #[tokio::test]
    async fn test_update_capacity() {
        let transport = FakeTransport::new();
        transport.respond(Method::Put, "/courses/8", 200, json!({"message": "ok"}));
        transport.respond(Method::Get, "/courses", 200, json!({"courses": []}));
        transport.respond(Method::Get, "/auth/users", 200, json!({"users": []}));
        let mut dashboard = managed(transport);

        let mut form = CapacityForm {
            capacity: "40".to_string(),
        };
        assert_eq!(dashboard.update_capacity(&mut form).await, Outcome::Applied);
        assert_eq!(
            dashboard.client().transport().requests()[0].body,
            Some(json!({"CAPACITY": 40}))
        );
        assert_eq!(
            dashboard.notifier().last(),
            Some(Notice::success("Course updated successfully!"))
        );
    }
}
