//! Grade renderers

use super::{Fragment, LabelMap, Table};
use super::{GRADES_STUDENTS_ONLY, NOT_GRADED, NO_COURSE_GRADES, NO_GRADES};
use crate::api::dto::Grade;

/// The current student's grades, course names resolved through `course_names`
pub fn my_grades(grades: Option<&[Grade]>, course_names: &LabelMap) -> Fragment {
    let grades = match grades {
        Some(grades) if !grades.is_empty() => grades,
        _ => return Fragment::Placeholder(NO_GRADES),
    };

    Fragment::Table(Table {
        headers: vec!["Course", "Grade"],
        rows: grades
            .iter()
            .map(|grade| {
                vec![
                    grade
                        .course_id
                        .map(|id| course_names.resolve(id))
                        .unwrap_or_else(|| "-".to_string()),
                    grade_label(grade),
                ]
            })
            .collect(),
    })
}

/// Shown instead of the grade list to anyone who is not a student
pub fn grades_restricted() -> Fragment {
    Fragment::Placeholder(GRADES_STUDENTS_ONLY)
}

/// Grades of one course, for the management view
pub fn course_grades(grades: Option<&[Grade]>) -> Fragment {
    let grades = match grades {
        Some(grades) if !grades.is_empty() => grades,
        _ => return Fragment::Placeholder(NO_COURSE_GRADES),
    };

    Fragment::Table(Table {
        headers: vec!["Student ID", "Grade"],
        rows: grades
            .iter()
            .map(|grade| {
                vec![
                    grade
                        .student_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    grade_label(grade),
                ]
            })
            .collect(),
    })
}

fn grade_label(grade: &Grade) -> String {
    match grade.value.as_deref() {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => NOT_GRADED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::Course;

    fn grade(student: i64, course: i64, value: Option<&str>) -> Grade {
        Grade {
            grade_id: None,
            student_id: Some(student),
            course_id: Some(course),
            value: value.map(str::to_string),
        }
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            my_grades(None, &LabelMap::unresolved()).placeholder(),
            Some("No grades available yet.")
        );
        assert_eq!(
            grades_restricted().placeholder(),
            Some("Grades view is for students only.")
        );
        assert_eq!(course_grades(Some(&[][..])).placeholder(), Some(NO_COURSE_GRADES));
    }

    #[test]
    fn test_my_grades_resolves_course_names() {
        let grades = vec![grade(3, 1, Some("A")), grade(3, 2, None)];
        let names = LabelMap::from_courses(&[Course {
            course_id: 1,
            course_name: "Algebra".to_string(),
            capacity: None,
            owner_id: 9,
        }]);

        let fragment = my_grades(Some(grades.as_slice()), &names);
        let table = fragment.table().unwrap();
        assert_eq!(table.rows[0], vec!["Algebra".to_string(), "A".to_string()]);
        assert_eq!(table.rows[1], vec!["2".to_string(), "Not graded".to_string()]);
    }

    #[test]
    fn test_course_grades_rows() {
        let grades = vec![grade(3, 1, Some("B")), grade(4, 1, Some(""))];
        let fragment = course_grades(Some(grades.as_slice()));
        let table = fragment.table().unwrap();
        assert_eq!(table.headers, vec!["Student ID", "Grade"]);
        assert_eq!(table.rows[1], vec!["4".to_string(), NOT_GRADED.to_string()]);
    }
}
