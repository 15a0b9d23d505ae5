//! Project store error types.

use api_client::ApiError;
use auth::AuthError;
use session_storage::StorageError;
use thiserror::Error;

/// Errors returned by store actions.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A remote call failed. `message` is what the store recorded as its
    /// current error.
    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },

    /// Session storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Authentication error.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The selected script is not a type the analysis service accepts.
    #[error("Unsupported script file {file_name}. Allowed: {allowed}")]
    UnsupportedScriptFile { file_name: String, allowed: String },
}

impl StoreError {
    /// Message suitable for showing to a user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Result type for store actions.
pub type StoreResult<T> = Result<T, StoreError>;
