//! Plain-text rendering of store state.

use entities::{Project, User};

/// One line per project: selection marker, id, title, status, budget and
/// due date.
pub fn project_line(project: &Project, selected: bool) -> String {
    format!(
        "{} {}  {}  [{}]  {}  due {}",
        if selected { "*" } else { " " },
        project.id,
        project.title,
        project.status,
        project.budget.as_deref().unwrap_or("-"),
        project.due_date.as_deref().unwrap_or("-"),
    )
}

/// Multi-line details of a single project.
pub fn project_details(project: &Project) -> String {
    let mut lines = vec![
        format!("{} ({})", project.title, project.id),
        format!("Status:  {}", project.status),
    ];
    if let Some(description) = project.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("About:   {}", description));
    }
    lines.push(format!(
        "Budget:  {}",
        project.budget.as_deref().unwrap_or("-")
    ));
    lines.push(format!(
        "Due:     {}",
        project.due_date.as_deref().unwrap_or("-")
    ));
    if let Some(breakdown) = &project.script_breakdown {
        lines.push(format!("Scenes:  {}", breakdown.scenes.len()));
    }
    lines.join("\n")
}

/// Who is signed in, with the remaining days for guests.
pub fn user_summary(user: &User, days_left: i64) -> String {
    if user.is_guest() {
        format!(
            "{} <{}> (guest, {} day{} left)",
            user.name,
            user.email,
            days_left,
            if days_left == 1 { "" } else { "s" }
        )
    } else {
        format!("{} <{}> ({})", user.name, user.email, user.role)
    }
}
