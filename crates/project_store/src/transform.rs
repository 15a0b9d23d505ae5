//! Mapping from the server's project records to client projects.

use api_client::RemoteProject;
use chrono::{DateTime, Duration, Utc};
use entities::{Project, ProjectStatus, ScriptBreakdown};

/// Team shown for every project until the server reports teams.
pub const PLACEHOLDER_TEAM: &str = "Production Team";

/// Genre shown for every project until the server reports genres.
pub const PLACEHOLDER_GENRE: &str = "Drama";

/// Due date shown when the server has no duration estimate.
pub const UNSCHEDULED_DUE_DATE: &str = "TBD";

/// Converts a server project into the client's display shape.
///
/// `now` anchors the due date and stands in for a missing creation time.
pub fn transform_project_data(remote: RemoteProject, now: DateTime<Utc>) -> Project {
    let status = remote
        .status
        .as_deref()
        .map(ProjectStatus::from_remote)
        .unwrap_or_default();
    let script_breakdown = remote
        .analysis_data
        .as_ref()
        .and_then(ScriptBreakdown::from_analysis);

    Project {
        id: remote.id,
        title: remote.title,
        description: remote.description,
        status,
        budget: Some(format_budget(remote.budget_total)),
        due_date: Some(format_due_date(remote.estimated_duration_days, now)),
        team: Some(PLACEHOLDER_TEAM.to_string()),
        created_at: remote.created_at.unwrap_or(now),
        genre: Some(PLACEHOLDER_GENRE.to_string()),
        script_breakdown,
        analysis_data: remote.analysis_data,
        budget_total: remote.budget_total,
        estimated_duration_days: remote.estimated_duration_days,
    }
}

/// Formats a budget in thousands of dollars, e.g. `5000.0` as `"$5K"`.
///
/// Halves round up. A missing budget shows as `"$0K"`.
pub fn format_budget(budget_total: Option<f64>) -> String {
    let thousands = budget_total
        .filter(|total| total.is_finite())
        .map_or(0, |total| (total / 1000.0 + 0.5).floor() as i64);
    format!("${}K", thousands)
}

/// Formats `now + days` as a US short date (`M/D/YYYY`), or `"TBD"`.
pub fn format_due_date(estimated_duration_days: Option<i64>, now: DateTime<Utc>) -> String {
    estimated_duration_days
        .and_then(Duration::try_days)
        .and_then(|delta| now.checked_add_signed(delta))
        .map(|due| due.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| UNSCHEDULED_DUE_DATE.to_string())
}
