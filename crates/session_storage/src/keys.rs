//! Known storage key definitions.

use serde::{Deserialize, Serialize};

/// Keys the client persists between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKey {
    /// "true" or "false".
    IsLoggedIn,
    /// JSON-encoded user record.
    UserData,
    /// Opaque bearer token.
    AccessToken,
    /// Cleared on logout. Nothing in the client reads or writes it.
    GuestAccessStart,
}

impl StorageKey {
    /// Returns the storage key name.
    pub fn key_name(&self) -> &'static str {
        match self {
            Self::IsLoggedIn => "isLoggedIn",
            Self::UserData => "userData",
            Self::AccessToken => "access_token",
            Self::GuestAccessStart => "guestAccessStart",
        }
    }

    /// Returns all known storage keys.
    pub fn all() -> &'static [StorageKey] {
        &[
            Self::IsLoggedIn,
            Self::UserData,
            Self::AccessToken,
            Self::GuestAccessStart,
        ]
    }

    /// Keys removed when a session ends.
    pub fn session_keys() -> &'static [StorageKey] {
        Self::all()
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key_name())
    }
}

impl TryFrom<&str> for StorageKey {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::all()
            .iter()
            .copied()
            .find(|key| key.key_name() == s)
            .ok_or_else(|| format!("Unknown storage key: {}", s))
    }
}
