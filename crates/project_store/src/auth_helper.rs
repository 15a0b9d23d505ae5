//! Sign-in and sign-out flows with navigation.

use std::sync::Arc;

use auth::{Credentials, StaticCredentials};
use entities::User;
use tracing::{info, warn};

use crate::{Navigator, ProjectStore, Route, StoreResult};

/// Combines the store's session actions with view changes.
pub struct AuthHelper {
    store: Arc<ProjectStore>,
    navigator: Arc<dyn Navigator>,
    demo_account: Option<StaticCredentials>,
}

impl AuthHelper {
    pub fn new(store: Arc<ProjectStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            demo_account: None,
        }
    }

    /// Accepts `account` in [`AuthHelper::demo_login`].
    pub fn with_demo_account(mut self, account: StaticCredentials) -> Self {
        self.demo_account = Some(account);
        self
    }

    /// Signs in against the configured demo account without a server.
    ///
    /// Returns false when no demo account is configured, the credentials do
    /// not match, or the session could not be saved.
    pub async fn demo_login(&self, email: &str, password: &str) -> bool {
        let Some(account) = &self.demo_account else {
            warn!("Demo login attempted but no demo account is configured");
            return false;
        };

        let user = match account.verify(&Credentials::new(email, password)) {
            Ok(user) => user,
            Err(e) => {
                info!(email, error = %e, "Demo login rejected");
                return false;
            }
        };

        if let Err(e) = self.store.sign_in(user).await {
            warn!(error = %e, "Failed to save demo session");
            return false;
        }

        self.navigator.navigate(Route::Projects);
        true
    }

    /// Signs in through the server and opens the project list.
    pub async fn login(&self, email: &str, password: &str) -> StoreResult<User> {
        let user = self.store.login(email, password).await?;
        self.navigator.navigate(Route::Projects);
        Ok(user)
    }

    /// Ends the session and returns to the sign-in view.
    pub async fn logout(&self) {
        self.store.logout().await;
        self.navigator.navigate(Route::Login);
    }

    pub async fn is_logged_in(&self) -> bool {
        self.store.is_logged_in().await
    }

    pub fn store(&self) -> &Arc<ProjectStore> {
        &self.store
    }
}
