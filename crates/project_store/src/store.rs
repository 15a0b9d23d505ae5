//! The client state container.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use api_client::{
    ApiError, AuthApi, LoginRequest, NewProjectUpload, ProjectsApi, ScriptFile,
    UpdateProjectRequest, ALLOWED_SCRIPT_EXTENSIONS,
};
use auth::SessionState;
use chrono::{Duration, Utc};
use entities::{Project, ProjectStatus, ScriptBreakdown, User};
use session_storage::{SessionStorage, StorageKey};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::{transform_project_data, LoadingTracker, StoreError, StoreResult};

/// Role given to users the server reports without one.
const DEFAULT_ROLE: &str = "user";

/// Role of guest users.
const GUEST_ROLE: &str = "guest";

/// Mutable state owned by [`ProjectStore`].
#[derive(Debug, Clone, Default)]
struct StoreState {
    session: SessionState,
    projects: Vec<Project>,
    selected_project_id: Option<String>,
    error: Option<String>,
}

impl StoreState {
    fn find(&self, identifier: &str) -> Option<&Project> {
        self.projects
            .iter()
            .find(|p| p.id == identifier)
            .or_else(|| self.projects.iter().find(|p| p.matches(identifier)))
    }

    fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }
}

/// Projects, selection and session of the client.
///
/// All state changes go through the store's actions. Actions that talk to
/// the server never hold the state lock across the remote call; they apply
/// the outcome once the call settles.
pub struct ProjectStore {
    state: RwLock<StoreState>,
    storage: Arc<dyn SessionStorage>,
    auth_api: Arc<dyn AuthApi>,
    projects_api: Arc<dyn ProjectsApi>,
    loading: LoadingTracker,
    fetch_generation: AtomicU64,
}

impl ProjectStore {
    /// Creates an empty, logged-out store.
    pub fn new(
        storage: Arc<dyn SessionStorage>,
        auth_api: Arc<dyn AuthApi>,
        projects_api: Arc<dyn ProjectsApi>,
    ) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            storage,
            auth_api,
            projects_api,
            loading: LoadingTracker::new(),
            fetch_generation: AtomicU64::new(0),
        }
    }

    /// Creates a store whose remote calls all go to `client`.
    pub fn with_client<C>(storage: Arc<dyn SessionStorage>, client: Arc<C>) -> Self
    where
        C: AuthApi + ProjectsApi + 'static,
    {
        Self::new(storage, client.clone(), client)
    }

    /// Seeds the collection and selects its first project.
    pub fn with_projects(self, projects: Vec<Project>) -> Self {
        let selected_project_id = projects.first().map(|p| p.id.clone());
        Self {
            state: RwLock::new(StoreState {
                projects,
                selected_project_id,
                ..StoreState::default()
            }),
            ..self
        }
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Signs in through the server.
    ///
    /// On success the bearer token and user are persisted and the project
    /// list is refreshed. A failed refresh is logged and left in `error`; it
    /// does not fail the login.
    pub async fn login(&self, email: &str, password: &str) -> StoreResult<User> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = {
            let _loading = self.loading.start();
            match self.auth_api.login(&request).await {
                Ok(response) => response,
                Err(e) => return Err(self.record_api_error("Login failed", e).await),
            }
        };

        let remote_user = response.user;
        let user = User::registered(
            remote_user.display_name(),
            remote_user.role.as_deref().unwrap_or(DEFAULT_ROLE),
            remote_user.email.clone(),
        );

        self.storage
            .save(StorageKey::AccessToken, &response.access_token)?;
        if let Err(e) = self.sign_in(user.clone()).await {
            if let Err(clear_err) = self.storage.clear(StorageKey::AccessToken) {
                warn!(error = %clear_err, "Failed to drop access token after failed login");
            }
            error!(error = %e, "Failed to save session after login");
            self.state.write().await.error = Some(e.user_message());
            return Err(e);
        }
        info!(email = %user.email, "Logged in");

        if let Err(e) = self.fetch_projects().await {
            warn!(error = %e, "Project refresh after login failed");
        }

        Ok(user)
    }

    /// Signs `user` in without contacting the server and persists the session.
    pub async fn sign_in(&self, user: User) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let mut session = state.session.clone();
        session.sign_in(user);
        self.persist_session(&session)?;
        state.session = session;
        state.error = None;
        Ok(())
    }

    /// Signs in a guest whose access lasts for `validity`.
    pub async fn start_guest_session(
        &self,
        name: &str,
        email: &str,
        validity: Duration,
    ) -> StoreResult<User> {
        let user = User::guest(name, GUEST_ROLE, email, Utc::now() + validity);
        self.sign_in(user.clone()).await?;
        info!(email = %user.email, expires_at = ?user.expires_at, "Guest session started");
        Ok(user)
    }

    /// Replaces the current user record and persists it.
    pub async fn set_user(&self, user: User) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let mut session = state.session.clone();
        session.set_user(user);
        self.persist_session(&session)?;
        state.session = session;
        Ok(())
    }

    /// Ends the session.
    ///
    /// The server is told first, but its answer does not matter: local state
    /// and stored session keys are always cleared.
    pub async fn logout(&self) {
        if let Err(e) = self.auth_api.logout().await {
            warn!(error = %e, "Remote logout failed, clearing local session anyway");
        }

        {
            let mut state = self.state.write().await;
            // Responses of fetches started before now must not repopulate.
            self.fetch_generation.fetch_add(1, Ordering::SeqCst);
            state.session.sign_out();
            state.projects.clear();
            state.selected_project_id = None;
        }

        for key in StorageKey::session_keys() {
            if let Err(e) = self.storage.clear(*key) {
                warn!(key = %key, error = %e, "Failed to clear stored session key");
            }
        }

        info!("Logged out");
    }

    /// Logs an expired guest out.
    ///
    /// Returns false if the session was ended, true otherwise.
    pub async fn check_guest_access(&self) -> bool {
        let expired = {
            let state = self.state.read().await;
            state.session.guest_access_expired_at(Utc::now())
        };

        if expired {
            info!("Guest access expired");
            self.logout().await;
            return false;
        }
        true
    }

    /// Restores the session saved by a previous run.
    ///
    /// An expired guest is logged out right away. A restored login refreshes
    /// the project list; a failed refresh is logged only.
    pub async fn initialize_from_storage(&self) {
        let logged_in_flag = self.load_or_warn(StorageKey::IsLoggedIn);
        let user_json = self.load_or_warn(StorageKey::UserData);

        let session = match SessionState::restore(logged_in_flag.as_deref(), user_json.as_deref())
        {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Ignoring stored user record");
                SessionState::default()
            }
        };

        let (is_logged_in, is_guest) = (session.is_logged_in(), session.is_guest_user());
        self.state.write().await.session = session;
        debug!(is_logged_in, is_guest, "Session restored from storage");

        if is_guest && !self.check_guest_access().await {
            return;
        }

        if is_logged_in {
            if let Err(e) = self.fetch_projects().await {
                warn!(error = %e, "Project refresh after restore failed");
            }
        }
    }

    pub async fn is_logged_in(&self) -> bool {
        self.state.read().await.session.is_logged_in()
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.session.user().cloned()
    }

    pub async fn is_guest_user(&self) -> bool {
        self.state.read().await.session.is_guest_user()
    }

    /// Evaluated against the wall clock on every call.
    pub async fn guest_access_expired(&self) -> bool {
        self.state
            .read()
            .await
            .session
            .guest_access_expired_at(Utc::now())
    }

    /// Evaluated against the wall clock on every call.
    pub async fn days_until_guest_expiry(&self) -> i64 {
        self.state
            .read()
            .await
            .session
            .days_until_guest_expiry_at(Utc::now())
    }

    // =========================================================================
    // Projects
    // =========================================================================

    /// Replaces the collection with the server's project list.
    ///
    /// If another fetch was started or the session ended after this one
    /// began, its outcome is dropped: the collection and `error` are left to
    /// the later action.
    pub async fn fetch_projects(&self) -> StoreResult<Vec<Project>> {
        let _loading = self.loading.start();
        let generation = self.fetch_generation.fetch_add(1, Ordering::SeqCst) + 1;

        let remote = match self.projects_api.get_projects().await {
            Ok(remote) => remote,
            Err(e) if self.is_current_fetch(generation) => {
                return Err(self.record_api_error("Failed to fetch projects", e).await)
            }
            Err(e) => {
                debug!(generation, error = %e, "Superseded project fetch failed");
                return Err(api_error("Failed to fetch projects", e));
            }
        };

        let now = Utc::now();
        let projects: Vec<Project> = remote
            .into_iter()
            .map(|p| transform_project_data(p, now))
            .collect();

        let mut state = self.state.write().await;
        if self.is_current_fetch(generation) {
            debug!(count = projects.len(), "Projects fetched");
            state.projects = projects.clone();
            state.error = None;
        } else {
            debug!(generation, "Discarding superseded project list");
        }

        Ok(projects)
    }

    /// Uploads a script as a new project and puts it first in the collection.
    pub async fn create_project_with_script(
        &self,
        title: &str,
        description: &str,
        file: ScriptFile,
    ) -> StoreResult<Project> {
        if !file.is_supported() {
            let err = StoreError::UnsupportedScriptFile {
                file_name: file.file_name.clone(),
                allowed: ALLOWED_SCRIPT_EXTENSIONS.join(", "),
            };
            error!(error = %err, "Rejected script upload");
            self.state.write().await.error = Some(err.user_message());
            return Err(err);
        }

        let upload = NewProjectUpload {
            title: title.to_string(),
            description: description.to_string(),
            file,
        };

        let remote = {
            let _loading = self.loading.start();
            match self.projects_api.create_project(upload).await {
                Ok(remote) => remote,
                Err(e) => return Err(self.record_api_error("Failed to create project", e).await),
            }
        };

        let project = transform_project_data(remote, Utc::now());
        let mut state = self.state.write().await;
        state.projects.insert(0, project.clone());
        state.error = None;
        info!(project_id = %project.id, title = %project.title, "Project created");

        Ok(project)
    }

    /// Gets the analysis payload of a project from the server.
    pub async fn get_project_analysis(&self, id: &str) -> StoreResult<serde_json::Value> {
        let _loading = self.loading.start();
        match self.projects_api.get_project_analysis(id).await {
            Ok(response) => Ok(response.analysis_data),
            Err(e) => Err(self
                .record_api_error("Failed to fetch project analysis", e)
                .await),
        }
    }

    /// Sends a new analysis payload and mirrors it into the local project.
    pub async fn update_project_analysis(
        &self,
        id: &str,
        data: serde_json::Value,
    ) -> StoreResult<()> {
        {
            let _loading = self.loading.start();
            if let Err(e) = self.projects_api.update_project_analysis(id, &data).await {
                return Err(self
                    .record_api_error("Failed to update project analysis", e)
                    .await);
            }
        }

        let mut state = self.state.write().await;
        if let Some(project) = state.find_by_id_mut(id) {
            project.script_breakdown = ScriptBreakdown::from_analysis(&data);
            project.analysis_data = Some(data);
        }
        state.error = None;
        Ok(())
    }

    /// Selects a project by id or, for older callers, by title.
    ///
    /// Returns false and leaves the selection alone if nothing matches.
    pub async fn set_selected_project(&self, identifier: &str) -> bool {
        let mut state = self.state.write().await;
        match state.find(identifier).map(|p| p.id.clone()) {
            Some(id) => {
                state.selected_project_id = Some(id);
                true
            }
            None => {
                debug!(identifier, "No project to select");
                false
            }
        }
    }

    /// Changes a project's status on the server, then locally.
    ///
    /// An unknown identifier is a no-op.
    pub async fn update_project_status(
        &self,
        identifier: &str,
        status: ProjectStatus,
    ) -> StoreResult<()> {
        let Some(id) = self.resolve_id(identifier).await else {
            debug!(identifier, "No project to update");
            return Ok(());
        };

        let update = UpdateProjectRequest {
            status: status.to_remote().to_string(),
        };
        {
            let _loading = self.loading.start();
            if let Err(e) = self.projects_api.update_project(&id, &update).await {
                return Err(self
                    .record_api_error("Failed to update project status", e)
                    .await);
            }
        }

        let mut state = self.state.write().await;
        if let Some(project) = state.find_by_id_mut(&id) {
            project.status = status;
        }
        state.error = None;
        info!(project_id = %id, %status, "Project status updated");
        Ok(())
    }

    /// Deletes a project on the server, then locally.
    ///
    /// An unknown identifier is a no-op.
    pub async fn remove_project(&self, identifier: &str) -> StoreResult<()> {
        let Some(id) = self.resolve_id(identifier).await else {
            debug!(identifier, "No project to remove");
            return Ok(());
        };

        {
            let _loading = self.loading.start();
            if let Err(e) = self.projects_api.delete_project(&id).await {
                return Err(self.record_api_error("Failed to delete project", e).await);
            }
        }

        let mut state = self.state.write().await;
        state.projects.retain(|p| p.id != id);
        if state.selected_project_id.as_deref() == Some(id.as_str()) {
            state.selected_project_id = None;
        }
        state.error = None;
        info!(project_id = %id, "Project removed");
        Ok(())
    }

    /// Replaces the whole collection without contacting the server.
    pub async fn set_projects(&self, projects: Vec<Project>) {
        self.state.write().await.projects = projects;
    }

    /// Appends a project without contacting the server, stamping its
    /// creation time.
    pub async fn add_project(&self, mut project: Project) {
        project.created_at = Utc::now();
        self.state.write().await.projects.push(project);
    }

    pub async fn projects(&self) -> Vec<Project> {
        self.state.read().await.projects.clone()
    }

    /// The selected project, if the selection still points at one.
    pub async fn selected_project(&self) -> Option<Project> {
        let state = self.state.read().await;
        let id = state.selected_project_id.as_deref()?;
        state.projects.iter().find(|p| p.id == id).cloned()
    }

    pub async fn selected_project_id(&self) -> Option<String> {
        self.state.read().await.selected_project_id.clone()
    }

    /// Message of the most recent failed action.
    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    /// Returns true while any remote call is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn resolve_id(&self, identifier: &str) -> Option<String> {
        self.state
            .read()
            .await
            .find(identifier)
            .map(|p| p.id.clone())
    }

    fn is_current_fetch(&self, generation: u64) -> bool {
        generation == self.fetch_generation.load(Ordering::SeqCst)
    }

    /// Records a failed remote call as the current error.
    async fn record_api_error(&self, fallback: &str, source: ApiError) -> StoreError {
        error!(error = %source, "{}", fallback);
        let err = api_error(fallback, source);
        self.state.write().await.error = Some(err.user_message());
        err
    }

    fn persist_session(&self, session: &SessionState) -> StoreResult<()> {
        match session.user_json()? {
            Some(user_json) => self.storage.save(StorageKey::UserData, &user_json)?,
            None => self.storage.clear(StorageKey::UserData)?,
        }
        self.storage
            .save(StorageKey::IsLoggedIn, session.logged_in_flag())?;
        Ok(())
    }

    fn load_or_warn(&self, key: StorageKey) -> Option<String> {
        self.storage.load(key).unwrap_or_else(|e| {
            warn!(key = %key, error = %e, "Failed to read stored session key");
            None
        })
    }
}

/// Wraps a failed remote call, preferring the server's own message.
fn api_error(fallback: &str, source: ApiError) -> StoreError {
    let message = source
        .server_message()
        .unwrap_or_else(|| fallback.to_string());
    StoreError::Api { message, source }
}
