//! Project-related entity definitions.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ScriptBreakdown;

/// Display status of a project.
///
/// The server tracks a finer workflow status; see [`ProjectStatus::from_remote`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    /// Being drafted or worked on.
    #[default]
    Active,
    /// Waiting for review.
    Review,
    /// Finished or archived.
    Completed,
}

impl ProjectStatus {
    /// Maps a server workflow status onto a display status.
    ///
    /// Unknown values fall back to [`ProjectStatus::Active`].
    pub fn from_remote(status: &str) -> Self {
        match status {
            "draft" | "in_progress" => Self::Active,
            "review" => Self::Review,
            "completed" | "archived" => Self::Completed,
            _ => Self::Active,
        }
    }

    /// Workflow status sent to the server when this status is set locally.
    pub fn to_remote(&self) -> &'static str {
        match self {
            Self::Active => "in_progress",
            Self::Review => "review",
            Self::Completed => "completed",
        }
    }

    /// Badge classes used when rendering this status.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Active => "bg-yellow-400 text-black",
            Self::Review => "bg-[#232733] text-white",
            Self::Completed => "bg-green-400 text-black",
        }
    }

    /// Upper-case label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Review => "REVIEW",
            Self::Completed => "COMPLETED",
        }
    }

    /// Returns all statuses.
    pub fn all() -> &'static [ProjectStatus] {
        &[Self::Active, Self::Review, Self::Completed]
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|status| status.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown project status: {}", s))
    }
}

/// A project as held by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier.
    pub id: String,
    /// Project title. Older code paths look projects up by title.
    pub title: String,
    pub description: Option<String>,
    /// Display status. The badge color is derived from it.
    pub status: ProjectStatus,
    /// Formatted budget, e.g. "$5K".
    pub budget: Option<String>,
    /// Formatted due date, or "TBD".
    pub due_date: Option<String>,
    pub team: Option<String>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    pub genre: Option<String>,
    pub script_breakdown: Option<ScriptBreakdown>,
    /// Raw analysis payload from the server.
    #[serde(rename = "analysis_data")]
    pub analysis_data: Option<serde_json::Value>,
    #[serde(rename = "budget_total")]
    pub budget_total: Option<f64>,
    #[serde(rename = "estimated_duration_days")]
    pub estimated_duration_days: Option<i64>,
}

impl Project {
    /// Creates a new active project with a fresh identifier.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            status: ProjectStatus::Active,
            budget: None,
            due_date: None,
            team: None,
            created_at: Utc::now(),
            genre: None,
            script_breakdown: None,
            analysis_data: None,
            budget_total: None,
            estimated_duration_days: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// Badge classes for the current status.
    pub fn status_color(&self) -> &'static str {
        self.status.color()
    }

    /// Returns true if `identifier` is this project's id or, for older
    /// callers, its title.
    pub fn matches(&self, identifier: &str) -> bool {
        self.id == identifier || self.title == identifier
    }
}
