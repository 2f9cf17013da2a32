//! View Router
//!
//! Explicit state machine for the active dashboard section and the active
//! tab inside composite sections. A transition returns the loads the caller
//! has to run; a rejected transition leaves the state untouched.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::session::Role;

/// Top-level dashboard sections; exactly one is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Courses,
    Grades,
    Messages,
    CreateCourse,
    ManageCourse,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Courses,
        Section::Grades,
        Section::Messages,
        Section::CreateCourse,
        Section::ManageCourse,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Courses => "courses",
            Section::Grades => "grades",
            Section::Messages => "messages",
            Section::CreateCourse => "create-course",
            Section::ManageCourse => "manage-course",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| RouteError::UnknownSection(s.to_string()))
    }
}

/// Tabs of the messaging section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Inbox,
    Compose,
}

impl Tab {
    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Inbox => "inbox",
            Tab::Compose => "compose",
        }
    }
}

impl FromStr for Tab {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inbox" => Ok(Tab::Inbox),
            "compose" => Ok(Tab::Compose),
            other => Err(RouteError::UnknownTab(other.to_string())),
        }
    }
}

/// A fetch-and-render job triggered by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadAction {
    MyCourses,
    AllCourses,
    Grades,
    Messages,
    Roster(i64),
    CourseGrades(i64),
}

/// The course picked for management
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedCourse {
    pub id: i64,
    pub name: String,
}

/// Why a transition was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Please select a course first")]
    NoCourseSelected,

    #[error("Only teachers can create courses")]
    TeacherOnly,

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Unknown tab: {0}")]
    UnknownTab(String),
}

/// Section/tab state plus the single-slot course selection
#[derive(Debug, Clone)]
pub struct ViewRouter {
    role: Role,
    section: Section,
    tab: Tab,
    selected: Option<SelectedCourse>,
}

impl ViewRouter {
    /// Start on the courses section
    pub fn new(role: Role) -> Self {
        Self {
            role,
            section: Section::Courses,
            tab: Tab::default(),
            selected: None,
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn selected_course(&self) -> Option<&SelectedCourse> {
        self.selected.as_ref()
    }

    /// Whether the create-course control is offered
    pub fn can_create_courses(&self) -> bool {
        self.role.is_teacher()
    }

    /// Loads that refresh the courses section for this role
    pub fn course_loads(&self) -> Vec<LoadAction> {
        if self.role.is_student() {
            vec![LoadAction::MyCourses, LoadAction::AllCourses]
        } else {
            vec![LoadAction::AllCourses]
        }
    }

    /// Enter `target` and return the loads it needs
    pub fn navigate(&mut self, target: Section) -> Result<Vec<LoadAction>, RouteError> {
        let loads = match target {
            Section::Courses => self.course_loads(),
            Section::Grades => vec![LoadAction::Grades],
            Section::Messages => vec![LoadAction::Messages],
            Section::CreateCourse => {
                if !self.can_create_courses() {
                    return Err(RouteError::TeacherOnly);
                }
                Vec::new()
            }
            Section::ManageCourse => {
                let course = self.selected.as_ref().ok_or(RouteError::NoCourseSelected)?;
                vec![
                    LoadAction::Roster(course.id),
                    LoadAction::CourseGrades(course.id),
                ]
            }
        };

        tracing::debug!(from = %self.section, to = %target, "Switching section");
        self.section = target;
        Ok(loads)
    }

    /// Record the selection and enter the management section
    pub fn select_course(&mut self, id: i64, name: impl Into<String>) -> Vec<LoadAction> {
        self.selected = Some(SelectedCourse {
            id,
            name: name.into(),
        });
        self.section = Section::ManageCourse;
        vec![LoadAction::Roster(id), LoadAction::CourseGrades(id)]
    }

    /// Forget the selection; leaves the management section if it was active
    pub fn clear_selection(&mut self) -> Vec<LoadAction> {
        self.selected = None;
        if self.section == Section::ManageCourse {
            self.section = Section::Courses;
            self.course_loads()
        } else {
            Vec::new()
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_courses_loads_depend_on_role() {
        let mut student = ViewRouter::new(Role::Student);
        assert_eq!(
            student.navigate(Section::Courses).unwrap(),
            vec![LoadAction::MyCourses, LoadAction::AllCourses]
        );

        let mut teacher = ViewRouter::new(Role::Teacher);
        assert_eq!(
            teacher.navigate(Section::Courses).unwrap(),
            vec![LoadAction::AllCourses]
        );
    }

    #[test]
    fn test_manage_requires_selection() {
        let mut router = ViewRouter::new(Role::Teacher);
        router.navigate(Section::Messages).unwrap();

        assert_eq!(
            router.navigate(Section::ManageCourse),
            Err(RouteError::NoCourseSelected)
        );
        assert_eq!(router.section(), Section::Messages);
    }

    #[test]
    fn test_select_then_manage() {
        let mut router = ViewRouter::new(Role::Teacher);
        let loads = router.select_course(12, "Chemistry");
        assert_eq!(loads, vec![LoadAction::Roster(12), LoadAction::CourseGrades(12)]);
        assert_eq!(router.section(), Section::ManageCourse);

        router.navigate(Section::Grades).unwrap();
        assert_eq!(
            router.navigate(Section::ManageCourse).unwrap(),
            vec![LoadAction::Roster(12), LoadAction::CourseGrades(12)]
        );
    }

    #[test]
    fn test_clear_selection_returns_to_courses() {
        let mut router = ViewRouter::new(Role::Teacher);
        router.select_course(12, "Chemistry");

        let loads = router.clear_selection();
        assert_eq!(router.section(), Section::Courses);
        assert_eq!(loads, vec![LoadAction::AllCourses]);
        assert!(router.selected_course().is_none());
    }

    #[test]
    fn test_create_course_teacher_only() {
        let mut student = ViewRouter::new(Role::Student);
        assert!(!student.can_create_courses());
        assert_eq!(
            student.navigate(Section::CreateCourse),
            Err(RouteError::TeacherOnly)
        );

        let mut teacher = ViewRouter::new(Role::Teacher);
        assert!(teacher.navigate(Section::CreateCourse).unwrap().is_empty());
    }

    #[test]
    fn test_tab_is_independent_of_section() {
        let mut router = ViewRouter::new(Role::Student);
        router.switch_tab(Tab::Compose);
        router.navigate(Section::Grades).unwrap();
        assert_eq!(router.tab(), Tab::Compose);
    }

    #[test]
    fn test_section_names() {
        for section in Section::ALL {
            assert_eq!(section.as_str().parse::<Section>().unwrap(), section);
        }
        assert!(matches!(
            "settings".parse::<Section>(),
            Err(RouteError::UnknownSection(_))
        ));
    }
}
