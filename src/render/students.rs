//! Roster renderer

use super::{Card, CardKind, Field, Fragment, NO_STUDENTS};
use crate::api::dto::EnrolledStudent;

/// Students enrolled in the managed course
pub fn roster(students: Option<&[EnrolledStudent]>) -> Fragment {
    let students = match students {
        Some(students) if !students.is_empty() => students,
        _ => return Fragment::Placeholder(NO_STUDENTS),
    };

    Fragment::Cards(
        students
            .iter()
            .map(|student| Card {
                kind: CardKind::Student,
                title: None,
                fields: vec![
                    Field::new("Student ID", student.student_id.to_string()),
                    Field::new("Email", student.email.clone().unwrap_or_default()),
                ],
                action: None,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster() {
        assert_eq!(roster(None).placeholder(), Some("No students enrolled yet."));

        let students = vec![EnrolledStudent {
            student_id: 11,
            email: Some("kim@school.test".to_string()),
        }];
        let fragment = roster(Some(students.as_slice()));
        assert_eq!(
            fragment.to_html(),
            "<div class=\"student-card\"><p><strong>Student ID:</strong> 11</p>\
             <p><strong>Email:</strong> kim@school.test</p></div>"
        );
    }
}
