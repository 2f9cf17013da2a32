//! Entity Renderers
//!
//! Pure functions from backend collections to [`Fragment`] view models. A
//! fragment knows how to print itself as an HTML snippet ([`Fragment::to_html`])
//! or as plain text (`Display`), so renderers can be tested without any
//! rendering target.
//!
//! Empty or missing collections always produce one of the fixed placeholder
//! strings below.

mod courses;
mod grades;
mod lookup;
mod messages;
mod students;

pub use courses::{course_catalog, my_courses, teacher_courses};
pub use grades::{course_grades, grades_restricted, my_grades};
pub use lookup::LabelMap;
pub use messages::message_threads;
pub use students::roster;

use std::fmt;

pub const NOT_ENROLLED: &str = "You are not enrolled in any courses yet.";
pub const NO_COURSES: &str = "No courses available.";
pub const NO_TEACHER_COURSES: &str = "You have not created any courses yet.";
pub const NO_GRADES: &str = "No grades available yet.";
pub const GRADES_STUDENTS_ONLY: &str = "Grades view is for students only.";
pub const NO_COURSE_GRADES: &str = "No grades assigned yet.";
pub const NO_STUDENTS: &str = "No students enrolled yet.";
pub const NO_MESSAGES: &str = "No messages yet.";
pub const NOT_GRADED: &str = "Not graded";

/// Rendered content of one panel
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Fixed "no data" text
    Placeholder(&'static str),
    Cards(Vec<Card>),
    Table(Table),
    Threads(Vec<Thread>),
}

/// A card in a grid of courses or students
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub kind: CardKind,
    pub title: Option<String>,
    pub fields: Vec<Field>,
    pub action: Option<CardAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Course,
    Student,
}

impl CardKind {
    fn css_class(self) -> &'static str {
        match self {
            CardKind::Course => "course-card",
            CardKind::Student => "student-card",
        }
    }
}

/// Labelled value on a card
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

impl Field {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Button offered on a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    Enroll { course_id: i64 },
    Manage { course_id: i64, course_name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

/// One message thread with its history in chronological order
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    pub from: String,
    pub to: String,
    pub entries: Vec<String>,
}

impl Fragment {
    /// The placeholder text, if this fragment is one
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Fragment::Placeholder(text) => Some(*text),
            _ => None,
        }
    }

    pub fn cards(&self) -> &[Card] {
        match self {
            Fragment::Cards(cards) => cards,
            _ => &[],
        }
    }

    pub fn threads(&self) -> &[Thread] {
        match self {
            Fragment::Threads(threads) => threads,
            _ => &[],
        }
    }

    pub fn table(&self) -> Option<&Table> {
        match self {
            Fragment::Table(table) => Some(table),
            _ => None,
        }
    }

    /// HTML snippet with all text escaped
    pub fn to_html(&self) -> String {
        match self {
            Fragment::Placeholder(text) => format!("<p>{}</p>", escape_html(text)),
            Fragment::Cards(cards) => cards.iter().map(card_html).collect(),
            Fragment::Table(table) => table_html(table),
            Fragment::Threads(threads) => threads.iter().map(thread_html).collect(),
        }
    }
}

fn card_html(card: &Card) -> String {
    let mut html = format!("<div class=\"{}\">", card.kind.css_class());
    if let Some(title) = &card.title {
        html.push_str(&format!("<h3>{}</h3>", escape_html(title)));
    }
    for field in &card.fields {
        html.push_str(&format!(
            "<p><strong>{}:</strong> {}</p>",
            field.label,
            escape_html(&field.value)
        ));
    }
    match &card.action {
        Some(CardAction::Enroll { course_id }) => html.push_str(&format!(
            "<button class=\"btn-enroll\" data-course-id=\"{}\">Enroll</button>",
            course_id
        )),
        Some(CardAction::Manage {
            course_id,
            course_name,
        }) => html.push_str(&format!(
            "<button class=\"btn-manage\" data-course-id=\"{}\" data-course-name=\"{}\">Manage</button>",
            course_id,
            escape_html(course_name)
        )),
        None => {}
    }
    html.push_str("</div>");
    html
}

fn table_html(table: &Table) -> String {
    let mut html = String::from("<table class=\"grades-table\"><thead><tr>");
    for header in &table.headers {
        html.push_str(&format!("<th>{}</th>", header));
    }
    html.push_str("</tr></thead><tbody>");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

fn thread_html(thread: &Thread) -> String {
    let items: String = thread
        .entries
        .iter()
        .map(|entry| format!("<p class=\"message-item\">{}</p>", escape_html(entry)))
        .collect();
    format!(
        "<div class=\"message-box\"><p><strong>From:</strong> {}</p><p><strong>To:</strong> {}</p><div class=\"message-history\">{}</div></div>",
        escape_html(&thread.from),
        escape_html(&thread.to),
        items
    )
}

/// Escape text for use inside HTML elements and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Placeholder(text) => writeln!(f, "{}", text),
            Fragment::Cards(cards) => {
                for card in cards {
                    if let Some(title) = &card.title {
                        writeln!(f, "{}", title)?;
                    }
                    for field in &card.fields {
                        writeln!(f, "  {}: {}", field.label, field.value)?;
                    }
                    match &card.action {
                        Some(CardAction::Enroll { course_id }) => {
                            writeln!(f, "  [enroll {}]", course_id)?
                        }
                        Some(CardAction::Manage { course_id, .. }) => {
                            writeln!(f, "  [manage {}]", course_id)?
                        }
                        None => {}
                    }
                }
                Ok(())
            }
            Fragment::Table(table) => {
                let mut widths: Vec<usize> = table.headers.iter().map(|h| h.len()).collect();
                for row in &table.rows {
                    for (i, cell) in row.iter().enumerate() {
                        if i < widths.len() {
                            widths[i] = widths[i].max(cell.chars().count());
                        }
                    }
                }

                let header: Vec<String> = table
                    .headers
                    .iter()
                    .zip(&widths)
                    .map(|(h, w)| format!("{:<w$}", h, w = *w))
                    .collect();
                writeln!(f, "{}", header.join(" | ").trim_end())?;
                let rule = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);
                writeln!(f, "{}", "-".repeat(rule))?;

                for row in &table.rows {
                    let cells: Vec<String> = row
                        .iter()
                        .zip(&widths)
                        .map(|(c, w)| format!("{:<w$}", c, w = *w))
                        .collect();
                    writeln!(f, "{}", cells.join(" | ").trim_end())?;
                }
                Ok(())
            }
            Fragment::Threads(threads) => {
                for thread in threads {
                    writeln!(f, "From: {}  To: {}", thread.from, thread.to)?;
                    for entry in &thread.entries {
                        writeln!(f, "  - {}", entry)?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_html() {
        let fragment = Fragment::Placeholder(NO_MESSAGES);
        assert_eq!(fragment.to_html(), "<p>No messages yet.</p>");
        assert_eq!(fragment.to_string(), "No messages yet.\n");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_card_html_escapes_and_renders_action() {
        let fragment = Fragment::Cards(vec![Card {
            kind: CardKind::Course,
            title: Some("<script>".to_string()),
            fields: vec![Field::new("Capacity", "30")],
            action: Some(CardAction::Enroll { course_id: 4 }),
        }]);

        let html = fragment.to_html();
        assert!(html.starts_with("<div class=\"course-card\"><h3>&lt;script&gt;</h3>"));
        assert!(html.contains("<p><strong>Capacity:</strong> 30</p>"));
        assert!(html.contains("data-course-id=\"4\">Enroll</button>"));
    }

    #[test]
    fn test_table_text_alignment() {
        let fragment = Fragment::Table(Table {
            headers: vec!["Course", "Grade"],
            rows: vec![
                vec!["Algebra".to_string(), "A".to_string()],
                vec!["Art".to_string(), NOT_GRADED.to_string()],
            ],
        });

        let text = fragment.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Course  | Grade");
        assert_eq!(lines[2], "Algebra | A");
        assert_eq!(lines[3], "Art     | Not graded");
    }
}
