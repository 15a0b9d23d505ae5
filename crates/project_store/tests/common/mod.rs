#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use api_client::{
    AnalysisResponse, ApiError, ApiResult, AuthApi, LoginRequest, LoginResponse,
    NewProjectUpload, ProjectsApi, RemoteProject, RemoteUser, UpdateProjectRequest,
};
use async_trait::async_trait;
use project_store::ProjectStore;
use session_storage::{MemoryStorage, SessionStorage, StorageError, StorageKey, StorageResult};
use tokio::sync::Notify;

pub const ADMIN_EMAIL: &str = "admin@scenesplit.com";
pub const ADMIN_PASSWORD: &str = "password123";

/// How a mocked endpoint fails.
#[derive(Debug, Clone)]
pub enum Failure {
    /// `{"detail": ...}` payload.
    Detail(u16, &'static str),
    /// `{"error": {"message": ...}}` payload.
    Message(u16, &'static str),
    /// Status without a readable payload.
    Bare(u16),
    Network,
}

impl Failure {
    fn to_error(&self) -> ApiError {
        match self {
            Self::Detail(status, detail) => ApiError::with_detail(*status, *detail),
            Self::Message(status, message) => ApiError::with_message(*status, *message),
            Self::Bare(status) => ApiError::Status {
                status: *status,
                payload: None,
            },
            Self::Network => ApiError::Network("connection refused".to_string()),
        }
    }
}

/// In-memory stand-in for the SceneSplit server.
#[derive(Default)]
pub struct MockApi {
    projects: Mutex<Vec<RemoteProject>>,
    analysis: Mutex<HashMap<String, serde_json::Value>>,
    failures: Mutex<HashMap<&'static str, Failure>>,
    calls: Mutex<Vec<String>>,
    fetch_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_projects(projects: Vec<RemoteProject>) -> Arc<Self> {
        let api = Self::default();
        *api.projects.lock().unwrap() = projects;
        Arc::new(api)
    }

    pub fn set_projects(&self, projects: Vec<RemoteProject>) {
        *self.projects.lock().unwrap() = projects;
    }

    pub fn fail(&self, endpoint: &'static str, failure: Failure) {
        self.failures.lock().unwrap().insert(endpoint, failure);
    }

    pub fn recover(&self, endpoint: &'static str) {
        self.failures.lock().unwrap().remove(endpoint);
    }

    /// Makes the next `get_projects` call wait for `gate` after it has read
    /// the project list.
    pub fn hold_next_fetch(&self, gate: Arc<Notify>) {
        *self.fetch_gate.lock().unwrap() = Some(gate);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(endpoint))
            .count()
    }

    fn record(&self, endpoint: &'static str, detail: &str) -> ApiResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}", endpoint, detail).trim_end().to_string());
        match self.failures.lock().unwrap().get(endpoint) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AuthApi for MockApi {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        self.record("login", &request.email)?;
        if request.email != ADMIN_EMAIL || request.password != ADMIN_PASSWORD {
            return Err(ApiError::with_detail(401, "Incorrect email or password"));
        }

        Ok(LoginResponse {
            access_token: "token_test".to_string(),
            token_type: Some("bearer".to_string()),
            expires_in: Some(86_400),
            user: RemoteUser {
                full_name: Some("Admin User".to_string()),
                username: Some("admin".to_string()),
                role: Some("ADMIN".to_string()),
                email: ADMIN_EMAIL.to_string(),
            },
        })
    }

    async fn logout(&self) -> ApiResult<()> {
        self.record("logout", "")
    }
}

#[async_trait]
impl ProjectsApi for MockApi {
    async fn get_projects(&self) -> ApiResult<Vec<RemoteProject>> {
        // Gate, snapshot and outcome are fixed before the call is visible to
        // tests.
        let gate = self.fetch_gate.lock().unwrap().take();
        let projects = self.projects.lock().unwrap().clone();
        let outcome = self.record("get_projects", "");

        if let Some(gate) = gate {
            gate.notified().await;
        }
        outcome.map(|_| projects)
    }

    async fn create_project(&self, upload: NewProjectUpload) -> ApiResult<RemoteProject> {
        self.record("create_project", &upload.title)?;
        let project = RemoteProject {
            id: format!("created-{}", self.call_count("create_project")),
            title: upload.title,
            description: Some(upload.description),
            status: Some("draft".to_string()),
            ..Default::default()
        };
        self.projects.lock().unwrap().push(project.clone());
        Ok(project)
    }

    async fn get_project_analysis(&self, id: &str) -> ApiResult<AnalysisResponse> {
        self.record("get_project_analysis", id)?;
        Ok(AnalysisResponse {
            analysis_data: self
                .analysis
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .unwrap_or_default(),
        })
    }

    async fn update_project_analysis(&self, id: &str, data: &serde_json::Value) -> ApiResult<()> {
        self.record("update_project_analysis", id)?;
        self.analysis
            .lock()
            .unwrap()
            .insert(id.to_string(), data.clone());
        Ok(())
    }

    async fn update_project(&self, id: &str, update: &UpdateProjectRequest) -> ApiResult<()> {
        self.record("update_project", &format!("{} {}", id, update.status))?;
        if let Some(project) = self.projects.lock().unwrap().iter_mut().find(|p| p.id == id) {
            project.status = Some(update.status.clone());
        }
        Ok(())
    }

    async fn delete_project(&self, id: &str) -> ApiResult<()> {
        self.record("delete_project", id)?;
        self.projects.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }
}

pub fn remote_project(id: &str, title: &str, status: &str) -> RemoteProject {
    RemoteProject {
        id: id.to_string(),
        title: title.to_string(),
        status: Some(status.to_string()),
        budget_total: Some(5000.0),
        ..Default::default()
    }
}

pub fn sample_projects() -> Vec<RemoteProject> {
    vec![
        remote_project("p1", "Night Shift", "draft"),
        remote_project("p2", "Harbor Lights", "review"),
        remote_project("p3", "Last Reel", "archived"),
    ]
}

pub fn store_with(api: Arc<MockApi>, storage: Arc<MemoryStorage>) -> ProjectStore {
    ProjectStore::with_client(storage, api)
}

/// Memory storage whose writes to one key fail.
pub struct FailingStorage {
    inner: MemoryStorage,
    failing_key: StorageKey,
}

impl FailingStorage {
    pub fn new(failing_key: StorageKey) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStorage::new(),
            failing_key,
        })
    }
}

impl SessionStorage for FailingStorage {
    fn load(&self, key: StorageKey) -> StorageResult<Option<String>> {
        self.inner.load(key)
    }

    fn save(&self, key: StorageKey, value: &str) -> StorageResult<()> {
        if key == self.failing_key {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        self.inner.save(key, value)
    }

    fn clear(&self, key: StorageKey) -> StorageResult<()> {
        self.inner.clear(key)
    }
}
