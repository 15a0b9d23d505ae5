//! Remote service trait definitions.

use async_trait::async_trait;

use crate::{
    AnalysisResponse, ApiResult, LoginRequest, LoginResponse, NewProjectUpload, RemoteProject,
    UpdateProjectRequest,
};

/// Authentication endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges credentials for a bearer token and user record.
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse>;

    /// Invalidates the current token on the server.
    async fn logout(&self) -> ApiResult<()>;
}

/// Project endpoints.
#[async_trait]
pub trait ProjectsApi: Send + Sync {
    /// Lists all projects visible to the current user.
    async fn get_projects(&self) -> ApiResult<Vec<RemoteProject>>;

    /// Creates a project from an uploaded script.
    async fn create_project(&self, upload: NewProjectUpload) -> ApiResult<RemoteProject>;

    /// Gets the analysis payload of a project.
    async fn get_project_analysis(&self, id: &str) -> ApiResult<AnalysisResponse>;

    /// Replaces the analysis payload of a project.
    async fn update_project_analysis(&self, id: &str, data: &serde_json::Value) -> ApiResult<()>;

    /// Applies a partial update to a project.
    async fn update_project(&self, id: &str, update: &UpdateProjectRequest) -> ApiResult<()>;

    /// Deletes a project.
    async fn delete_project(&self, id: &str) -> ApiResult<()>;
}
