//! HTTP implementation of the remote service traits

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use session_storage::{SessionStorage, StorageKey};
use tracing::{debug, warn};

use crate::{
    AnalysisResponse, ApiError, ApiResult, AuthApi, ErrorPayload, LoginRequest, LoginResponse,
    NewProjectUpload, ProjectListResponse, ProjectsApi, RemoteProject, UpdateProjectRequest,
};

/// Client for the SceneSplit HTTP API
///
/// When built with a session storage, every request carries the stored
/// `access_token` as a bearer token.
#[derive(Clone)]
pub struct HttpApiClient {
    /// Server URL without a trailing slash
    base_url: String,
    /// HTTP client
    http_client: reqwest::Client,
    /// Source of the bearer token
    storage: Option<Arc<dyn SessionStorage>>,
}

impl HttpApiClient {
    /// Create a new client for `base_url`
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
            storage: None,
        }
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        Ok(Self {
            http_client,
            ..Self::new(base_url)
        })
    }

    /// Read the bearer token from `storage`
    pub fn with_storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Server URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn bearer_token(&self) -> Option<String> {
        let storage = self.storage.as_ref()?;
        match storage.load(StorageKey::AccessToken) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read access token, sending request without it");
                None
            }
        }
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and turn non-success statuses into errors
    async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = self
            .authorize(builder)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let payload = response.json::<ErrorPayload>().await.ok();
        debug!(status = status.as_u16(), ?payload, "Request failed");
        Err(ApiError::Status {
            status: status.as_u16(),
            payload,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        self.send(builder)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Check server health
    pub async fn health_check(&self) -> ApiResult<()> {
        self.send(self.http_client.get(self.url("/health")))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl AuthApi for HttpApiClient {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        debug!(email = %request.email, "Logging in");
        self.send_json(self.http_client.post(self.url("/auth/login")).json(request))
            .await
    }

    async fn logout(&self) -> ApiResult<()> {
        debug!("Logging out");
        self.send(self.http_client.post(self.url("/auth/logout")))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl ProjectsApi for HttpApiClient {
    async fn get_projects(&self) -> ApiResult<Vec<RemoteProject>> {
        debug!("Fetching projects");
        let response: ProjectListResponse =
            self.send_json(self.http_client.get(self.url("/projects/"))).await?;
        Ok(response.into_projects())
    }

    async fn create_project(&self, upload: NewProjectUpload) -> ApiResult<RemoteProject> {
        debug!(title = %upload.title, file = %upload.file.file_name, "Creating project");
        let file_part =
            multipart::Part::bytes(upload.file.content).file_name(upload.file.file_name);
        let form = multipart::Form::new()
            .text("title", upload.title)
            .text("description", upload.description)
            .part("file", file_part);

        self.send_json(self.http_client.post(self.url("/projects/")).multipart(form))
            .await
    }

    async fn get_project_analysis(&self, id: &str) -> ApiResult<AnalysisResponse> {
        debug!(project_id = %id, "Fetching project analysis");
        self.send_json(
            self.http_client
                .get(self.url(&format!("/projects/{}/analysis", id))),
        )
        .await
    }

    async fn update_project_analysis(&self, id: &str, data: &serde_json::Value) -> ApiResult<()> {
        debug!(project_id = %id, "Updating project analysis");
        self.send(
            self.http_client
                .put(self.url(&format!("/projects/{}/analysis", id)))
                .json(data),
        )
        .await
        .map(|_| ())
    }

    async fn update_project(&self, id: &str, update: &UpdateProjectRequest) -> ApiResult<()> {
        debug!(project_id = %id, status = %update.status, "Updating project");
        self.send(
            self.http_client
                .put(self.url(&format!("/projects/{}", id)))
                .json(update),
        )
        .await
        .map(|_| ())
    }

    async fn delete_project(&self, id: &str) -> ApiResult<()> {
        debug!(project_id = %id, "Deleting project");
        self.send(self.http_client.delete(self.url(&format!("/projects/{}", id))))
            .await
            .map(|_| ())
    }
}
