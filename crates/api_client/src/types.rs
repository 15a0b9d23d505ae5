//! Request and response types exchanged with the server.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Script file extensions the analysis service accepts.
pub const ALLOWED_SCRIPT_EXTENSIONS: &[&str] = &["pdf", "txt", "fountain"];

/// Login request body
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Login response body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Token lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: RemoteUser,
}

/// User record as the server reports it
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteUser {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub email: String,
}

impl RemoteUser {
    /// Full name, falling back to username, then email
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.username.as_deref())
            .unwrap_or(&self.email)
    }
}

/// Project record as the server reports it
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteProject {
    #[serde(alias = "_id", deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Workflow status: draft, in_progress, review, completed or archived
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub budget_total: Option<f64>,
    #[serde(default)]
    pub estimated_duration_days: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub analysis_data: Option<serde_json::Value>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

/// Project listing. Older servers wrap the list in an object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProjectListResponse {
    List(Vec<RemoteProject>),
    Wrapped { projects: Vec<RemoteProject> },
}

impl ProjectListResponse {
    pub fn into_projects(self) -> Vec<RemoteProject> {
        match self {
            Self::List(projects) | Self::Wrapped { projects } => projects,
        }
    }
}

/// A script file selected for upload
#[derive(Clone)]
pub struct ScriptFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl ScriptFile {
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }

    /// Lower-cased extension of the file name
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }

    /// Returns true if the analysis service accepts this file type
    pub fn is_supported(&self) -> bool {
        self.extension()
            .is_some_and(|ext| ALLOWED_SCRIPT_EXTENSIONS.contains(&ext.as_str()))
    }
}

impl std::fmt::Debug for ScriptFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptFile")
            .field("file_name", &self.file_name)
            .field("len", &self.content.len())
            .finish()
    }
}

/// Metadata and script for a new project
#[derive(Debug, Clone)]
pub struct NewProjectUpload {
    pub title: String,
    pub description: String,
    pub file: ScriptFile,
}

/// Analysis payload of one project
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub analysis_data: serde_json::Value,
}

/// Partial project update
#[derive(Debug, Clone, Serialize)]
pub struct UpdateProjectRequest {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_project_list_shapes() {
        let bare: ProjectListResponse =
            serde_json::from_value(json!([{"id": "p1", "title": "Night Shift"}])).unwrap();
        assert_eq!(bare.into_projects()[0].id, "p1");

        let wrapped: ProjectListResponse = serde_json::from_value(json!({
            "projects": [{"_id": "p2", "title": "Day Shift", "status": "review"}]
        }))
        .unwrap();
        let projects = wrapped.into_projects();
        assert_eq!(projects[0].id, "p2");
        assert_eq!(projects[0].status.as_deref(), Some("review"));
    }

    #[test]
    fn test_numeric_project_id() {
        let project: RemoteProject =
            serde_json::from_value(json!({"id": 42, "title": "Numbers"})).unwrap();
        assert_eq!(project.id, "42");
        assert!(project.budget_total.is_none());
    }

    #[test]
    fn test_remote_user_display_name() {
        let mut user = RemoteUser {
            email: "director@scenesplit.com".to_string(),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "director@scenesplit.com");

        user.username = Some("director".to_string());
        assert_eq!(user.display_name(), "director");

        user.full_name = Some("John Director".to_string());
        assert_eq!(user.display_name(), "John Director");
    }

    #[test]
    fn test_login_response_from_server() {
        let response: LoginResponse = serde_json::from_value(json!({
            "access_token": "token_abc",
            "token_type": "bearer",
            "expires_in": 86400,
            "user": {
                "id": "1",
                "email": "admin@scenesplit.com",
                "username": "admin",
                "full_name": "Admin User",
                "role": "ADMIN",
                "is_active": true
            }
        }))
        .unwrap();
        assert_eq!(response.access_token, "token_abc");
        assert_eq!(response.user.display_name(), "Admin User");
        assert_eq!(response.user.role.as_deref(), Some("ADMIN"));
    }

    #[test]
    fn test_script_file_types() {
        assert!(ScriptFile::new("pilot.fountain", vec![]).is_supported());
        assert!(ScriptFile::new("PILOT.PDF", vec![]).is_supported());
        assert!(!ScriptFile::new("pilot.docx", vec![]).is_supported());
        assert!(!ScriptFile::new("pilot", vec![]).is_supported());
    }

    #[test]
    fn test_login_request_debug_hides_password() {
        let request = LoginRequest {
            email: "a@b.c".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(!format!("{:?}", request).contains("hunter2"));
    }
}
