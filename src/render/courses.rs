//! Course renderers

use super::{Card, CardAction, CardKind, Field, Fragment, LabelMap};
use super::{NOT_ENROLLED, NO_COURSES, NO_TEACHER_COURSES};
use crate::api::dto::{Course, EnrolledCourse};
use crate::session::Role;

/// Courses the current student is enrolled in
pub fn my_courses(courses: Option<&[EnrolledCourse]>) -> Fragment {
    let courses = match courses {
        Some(courses) if !courses.is_empty() => courses,
        _ => return Fragment::Placeholder(NOT_ENROLLED),
    };

    Fragment::Cards(
        courses
            .iter()
            .map(|course| Card {
                kind: CardKind::Course,
                title: Some(format!("Course ID: {}", course.course_id)),
                fields: vec![Field::new("Email", course.email.clone().unwrap_or_default())],
                action: None,
            })
            .collect(),
    )
}

/// Every course, with the instructor resolved through `instructors`
///
/// Students get an enroll action on each card.
pub fn course_catalog(courses: Option<&[Course]>, instructors: &LabelMap, role: Role) -> Fragment {
    let courses = match courses {
        Some(courses) if !courses.is_empty() => courses,
        _ => return Fragment::Placeholder(NO_COURSES),
    };

    Fragment::Cards(
        courses
            .iter()
            .map(|course| Card {
                kind: CardKind::Course,
                title: Some(course.course_name.clone()),
                fields: vec![
                    Field::new("Capacity", capacity_label(course)),
                    Field::new("Instructor", instructors.resolve(course.owner_id)),
                ],
                action: role.is_student().then_some(CardAction::Enroll {
                    course_id: course.course_id,
                }),
            })
            .collect(),
    )
}

/// Courses owned by `teacher_id`, each with a manage action
pub fn teacher_courses(courses: Option<&[Course]>, teacher_id: i64) -> Fragment {
    let owned: Vec<&Course> = courses
        .unwrap_or_default()
        .iter()
        .filter(|course| course.owner_id == teacher_id)
        .collect();

    if owned.is_empty() {
        return Fragment::Placeholder(NO_TEACHER_COURSES);
    }

    Fragment::Cards(
        owned
            .into_iter()
            .map(|course| Card {
                kind: CardKind::Course,
                title: Some(course.course_name.clone()),
                fields: vec![Field::new("Capacity", capacity_label(course))],
                action: Some(CardAction::Manage {
                    course_id: course.course_id,
                    course_name: course.course_name.clone(),
                }),
            })
            .collect(),
    )
}

fn capacity_label(course: &Course) -> String {
    course
        .capacity
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string())
}
