//! Load paths: fetch a collection, resolve its cross-references, render
//!
//! A failed primary fetch is reported to the user. A failed secondary
//! (lookup) fetch is only logged; the render proceeds with raw ids.

use tracing::{error, warn};

use super::{Dashboard, Notice, Notifier, Panel};
use crate::api::{ClientError, Transport};
use crate::render::{self, LabelMap};
use crate::session::KeyValueStorage;
use crate::view::LoadAction;

impl<T: Transport, S: KeyValueStorage, N: Notifier> Dashboard<T, S, N> {
    pub(crate) async fn load(&mut self, action: LoadAction) {
        match action {
            LoadAction::MyCourses => self.load_my_courses().await,
            LoadAction::AllCourses => self.load_all_courses().await,
            LoadAction::Grades => self.load_grades().await,
            LoadAction::Messages => self.load_messages().await,
            LoadAction::Roster(course_id) => self.load_roster(course_id).await,
            LoadAction::CourseGrades(course_id) => self.load_course_grades(course_id).await,
        }
    }

    async fn load_my_courses(&mut self) {
        match self.client.my_enrolled_courses().await {
            Ok(courses) => self
                .screen
                .set(Panel::MyCourses, render::my_courses(courses.as_deref())),
            Err(e) => self.load_failed("courses", e),
        }
    }

    /// Catalog (and the teacher's own courses) with instructors resolved
    async fn load_all_courses(&mut self) {
        let courses = match self.client.list_courses().await {
            Ok(courses) => courses,
            Err(e) => return self.load_failed("all courses", e),
        };

        if self.user.role.is_teacher() {
            self.screen.set(
                Panel::TeacherCourses,
                render::teacher_courses(courses.as_deref(), self.user.id),
            );
        }

        let instructors = self.user_labels().await;
        self.screen.set(
            Panel::CourseCatalog,
            render::course_catalog(courses.as_deref(), &instructors, self.user.role),
        );
    }

    async fn load_grades(&mut self) {
        if !self.user.role.is_student() {
            self.screen.set(Panel::Grades, render::grades_restricted());
            return;
        }

        let grades = match self.client.my_grades().await {
            Ok(grades) => grades,
            Err(e) => return self.load_failed("grades", e),
        };

        let courses = match self.client.list_courses().await {
            Ok(courses) => LabelMap::from_courses(courses.as_deref().unwrap_or_default()),
            Err(e) => {
                warn!("Course lookup failed, showing raw ids: {}", e);
                LabelMap::unresolved()
            }
        };

        self.screen
            .set(Panel::Grades, render::my_grades(grades.as_deref(), &courses));
    }

    async fn load_messages(&mut self) {
        let messages = match self.client.my_messages().await {
            Ok(messages) => messages,
            Err(e) => return self.load_failed("messages", e),
        };

        let users = self.user_labels().await;
        self.screen.set(
            Panel::Messages,
            render::message_threads(messages.as_deref(), &users),
        );
    }

    async fn load_roster(&mut self, course_id: i64) {
        match self.client.course_students(course_id).await {
            Ok(students) => self
                .screen
                .set(Panel::Roster, render::roster(students.as_deref())),
            Err(e) => self.load_failed("students", e),
        }
    }

    async fn load_course_grades(&mut self, course_id: i64) {
        match self.client.course_grades(course_id).await {
            Ok(grades) => self
                .screen
                .set(Panel::CourseGrades, render::course_grades(grades.as_deref())),
            Err(e) => self.load_failed("grades", e),
        }
    }

    /// user id -> email, or an empty map when the directory is unavailable
    async fn user_labels(&self) -> LabelMap {
        match self.client.list_users().await {
            Ok(users) => LabelMap::from_users(users.as_deref().unwrap_or_default()),
            Err(e) => {
                warn!("User lookup failed, showing raw ids: {}", e);
                LabelMap::unresolved()
            }
        }
    }

    fn load_failed(&self, what: &str, err: ClientError) {
        error!("Error loading {}: {}", what, err);
        self.notifier
            .notify(Notice::error(format!("Error loading {}", what)));
    }
}
