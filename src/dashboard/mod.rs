//! Dashboard
//!
//! The application context: session, gateway, view router, rendered screen
//! and notifier in one object that every load path and mutation handler
//! receives explicitly.
//!
//! ## Data Flow
//!
//! 1. The router picks a section and yields [`LoadAction`]s
//! 2. Each load fetches its collection, then (if it cross-references) the
//!    lookup collection
//! 3. Renderers turn the results into [`Fragment`]s stored on the [`Screen`]
//! 4. Mutations call the backend and re-run the affected loads
//!
//! Loads and mutations borrow the dashboard mutably, so a section switch
//! can never interleave with a load that is still in flight.

mod auth;
mod error;
mod loaders;
mod mutations;
mod notify;

pub use auth::{login, signup, LoginForm, SignupForm};
pub use error::{DashboardError, DashboardResult};
pub use mutations::{CapacityForm, CreateCourseForm, GradeForm, MessageForm, Outcome};
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier};

use std::collections::HashMap;

use crate::api::{ApiClient, Transport};
use crate::render::{Fragment, LabelMap};
use crate::session::{KeyValueStorage, Role, SessionStore, User};
use crate::view::{LoadAction, RouteError, Section, Tab, ViewRouter};

/// Named display areas of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    /// Student's enrolled courses
    MyCourses,
    /// Every course
    CourseCatalog,
    /// Teacher's own courses
    TeacherCourses,
    Grades,
    Messages,
    /// Students of the managed course
    Roster,
    /// Grades of the managed course
    CourseGrades,
}

impl Panel {
    /// Panels shown by `section` for `role`, in display order
    pub fn for_section(section: Section, role: Role) -> Vec<Panel> {
        match section {
            Section::Courses if role.is_student() => vec![Panel::MyCourses, Panel::CourseCatalog],
            Section::Courses if role.is_teacher() => {
                vec![Panel::TeacherCourses, Panel::CourseCatalog]
            }
            Section::Courses => vec![Panel::CourseCatalog],
            Section::Grades => vec![Panel::Grades],
            Section::Messages => vec![Panel::Messages],
            Section::CreateCourse => Vec::new(),
            Section::ManageCourse => vec![Panel::Roster, Panel::CourseGrades],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Panel::MyCourses => "My Courses",
            Panel::CourseCatalog => "All Courses",
            Panel::TeacherCourses => "My Teaching Courses",
            Panel::Grades => "My Grades",
            Panel::Messages => "Messages",
            Panel::Roster => "Enrolled Students",
            Panel::CourseGrades => "Course Grades",
        }
    }
}

/// Everything currently rendered
#[derive(Debug, Default, Clone)]
pub struct Screen {
    /// Header label for the logged-in user
    pub user_label: String,
    /// Whether the create-course control is offered
    pub create_course_visible: bool,
    /// "Manage: <course>" heading of the management section
    pub manage_title: Option<String>,
    panels: HashMap<Panel, Fragment>,
}

impl Screen {
    pub fn panel(&self, panel: Panel) -> Option<&Fragment> {
        self.panels.get(&panel)
    }

    fn set(&mut self, panel: Panel, fragment: Fragment) {
        self.panels.insert(panel, fragment);
    }

    fn clear(&mut self, panel: Panel) {
        self.panels.remove(&panel);
    }
}

/// The logged-in dashboard
pub struct Dashboard<T: Transport, S: KeyValueStorage, N: Notifier> {
    client: ApiClient<T>,
    store: SessionStore<S>,
    user: User,
    router: ViewRouter,
    screen: Screen,
    notifier: N,
}

impl<T: Transport, S: KeyValueStorage, N: Notifier> Dashboard<T, S, N> {
    /// Restore the stored session without loading anything
    ///
    /// Fails with [`crate::session::SessionError::Unauthenticated`] when no
    /// complete session is stored.
    pub fn restore(
        mut client: ApiClient<T>,
        mut store: SessionStore<S>,
        notifier: N,
    ) -> DashboardResult<Self> {
        let session = store.load()?;
        client.set_token(Some(session.token));

        let user = session.user;
        let router = ViewRouter::new(user.role);
        let screen = Screen {
            user_label: user.email.clone(),
            create_course_visible: router.can_create_courses(),
            ..Screen::default()
        };

        tracing::debug!(user_id = user.id, role = %user.role, "Session restored");

        Ok(Self {
            client,
            store,
            user,
            router,
            screen,
            notifier,
        })
    }

    /// Restore the session and load the courses section
    pub async fn open(client: ApiClient<T>, store: SessionStore<S>, notifier: N) -> DashboardResult<Self> {
        let mut dashboard = Self::restore(client, store, notifier)?;
        let loads = dashboard.router.course_loads();
        dashboard.run(loads).await;
        Ok(dashboard)
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn router(&self) -> &ViewRouter {
        &self.router
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Panels of the active section that have content
    pub fn visible_panels(&self) -> Vec<(Panel, &Fragment)> {
        Panel::for_section(self.router.section(), self.user.role)
            .into_iter()
            .filter_map(|panel| self.screen.panel(panel).map(|f| (panel, f)))
            .collect()
    }

    /// Switch section and run its loads
    ///
    /// A refused transition is a no-op apart from a warning notice.
    pub async fn navigate(&mut self, section: Section) -> Result<(), RouteError> {
        match self.router.navigate(section) {
            Ok(loads) => {
                self.run(loads).await;
                Ok(())
            }
            Err(e) => {
                tracing::debug!(section = %section, "Navigation refused: {}", e);
                self.notifier.notify(Notice::warning(e.to_string()));
                Err(e)
            }
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.router.switch_tab(tab);
    }

    /// Pick a course for management and load its roster and grades
    pub async fn select_course(&mut self, course_id: i64, course_name: &str) {
        let loads = self.router.select_course(course_id, course_name);
        self.screen.manage_title = Some(format!("Manage: {}", course_name));
        self.run(loads).await;
    }

    /// Display name of `course_id` from the catalog, or the raw id
    pub async fn course_name(&self, course_id: i64) -> String {
        match self.client.list_courses().await {
            Ok(courses) => {
                LabelMap::from_courses(courses.as_deref().unwrap_or_default()).resolve(course_id)
            }
            Err(e) => {
                tracing::warn!("Course lookup failed, using raw id: {}", e);
                course_id.to_string()
            }
        }
    }

    /// End the session: both stored keys are removed
    ///
    /// Hands back the emptied store.
    pub fn logout(mut self) -> DashboardResult<SessionStore<S>> {
        self.client.set_token(None);
        self.store.clear()?;
        tracing::info!(user_id = self.user.id, "Logged out");
        Ok(self.store)
    }

    pub(crate) async fn run(&mut self, loads: Vec<LoadAction>) {
        for action in loads {
            self.load(action).await;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::api::fake::FakeTransport;
    use crate::api::Method;
    use crate::session::{MemoryStorage, SessionError};
    use serde_json::json;

    #[tokio::test]
    async fn test_open_without_session_is_unauthenticated() {
        let result = Dashboard::open(
            ApiClient::new(FakeTransport::new()),
            SessionStore::new(MemoryStorage::new()),
            RecordingNotifier::default(),
        )
        .await;

        assert!(matches!(
            result,
            Err(DashboardError::Session(SessionError::Unauthenticated))
        ));
    }

    #[tokio::test]
    async fn test_open_reflects_role() {
        let transport = FakeTransport::new();
        transport.respond(Method::Get, "/courses", 200, json!({"courses": []}));
        transport.respond(Method::Get, "/auth/users", 200, json!({"users": []}));

        let dashboard = Dashboard::open(
            ApiClient::new(transport),
            store_for(Role::Teacher, 4),
            RecordingNotifier::default(),
        )
        .await
        .unwrap();

        assert!(dashboard.screen().create_course_visible);
        assert_eq!(dashboard.screen().user_label, "user4@school.test");
        assert_eq!(dashboard.client().token(), Some("tok"));
        assert_eq!(
            dashboard.screen().panel(Panel::TeacherCourses).unwrap().placeholder(),
            Some(crate::render::NO_TEACHER_COURSES)
        );
    }

    #[tokio::test]
    async fn test_student_has_no_create_control() {
        let transport = FakeTransport::new();
        transport.respond(Method::Get, "/enrolments/students/me/courses", 200, json!({"courses": []}));
        transport.respond(Method::Get, "/courses", 200, json!({"courses": []}));

        let mut dashboard = dashboard(transport, Role::Student, 3);
        assert!(!dashboard.screen().create_course_visible);

        dashboard.navigate(Section::Courses).await.unwrap();
        let panels = dashboard.visible_panels();
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].1.placeholder(), Some(crate::render::NOT_ENROLLED));
        assert_eq!(panels[1].1.placeholder(), Some(crate::render::NO_COURSES));
    }

    #[tokio::test]
    async fn test_manage_without_selection_warns() {
        let mut dashboard = dashboard(FakeTransport::new(), Role::Teacher, 4);

        let result = dashboard.navigate(Section::ManageCourse).await;
        assert_eq!(result, Err(RouteError::NoCourseSelected));
        assert_eq!(dashboard.router().section(), Section::Courses);
        assert!(dashboard.client().transport().requests().is_empty());
        assert_eq!(
            dashboard.notifier().last(),
            Some(Notice::warning("Please select a course first"))
        );
    }

    #[tokio::test]
    async fn test_select_course_loads_roster_and_grades() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Get,
            "/enrolments/courses/8/students",
            200,
            json!({"students": [{"STUDENT_ID": 3, "EMAIL": "ana@school.test"}]}),
        );
        transport.respond(Method::Get, "/grades/courses/8/grades", 200, json!({"grades": []}));

        let mut dashboard = dashboard(transport, Role::Teacher, 4);
        dashboard.select_course(8, "History").await;

        assert_eq!(dashboard.router().section(), Section::ManageCourse);
        assert_eq!(dashboard.screen().manage_title.as_deref(), Some("Manage: History"));
        assert_eq!(dashboard.screen().panel(Panel::Roster).unwrap().cards().len(), 1);
        assert_eq!(
            dashboard.screen().panel(Panel::CourseGrades).unwrap().placeholder(),
            Some(crate::render::NO_COURSE_GRADES)
        );
    }

    #[tokio::test]
    async fn test_course_name_falls_back_to_id() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Get,
            "/courses",
            200,
            json!({"courses": [{"COURSE_ID": 8, "COURSE_NAME": "History", "USER_ID": 4}]}),
        );
        let dashboard = dashboard(transport, Role::Teacher, 4);

        assert_eq!(dashboard.course_name(8).await, "History");
        assert_eq!(dashboard.course_name(9).await, "9");
    }

    #[test]
    fn test_logout_clears_store() {
        let dashboard = dashboard(FakeTransport::new(), Role::Student, 3);
        let store = dashboard.logout().unwrap();
        assert!(store.storage().is_empty());

        let reopened = Dashboard::restore(
            ApiClient::new(FakeTransport::new()),
            store,
            RecordingNotifier::default(),
        );
        assert!(matches!(
            reopened,
            Err(DashboardError::Session(SessionError::Unauthenticated))
        ));
    }
}
