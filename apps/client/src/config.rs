//! Client configuration

use std::path::{Path, PathBuf};

use auth::{StaticCredentials, DEFAULT_GUEST_ACCESS_DAYS};
use entities::User;
use serde::{Deserialize, Serialize};

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the SceneSplit API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// File holding the persisted session
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    /// Length of a guest session in days
    #[serde(default = "default_guest_access_days")]
    pub guest_access_days: i64,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Email of the offline demo account
    #[serde(default)]
    pub demo_email: Option<String>,

    /// base64url SHA-256 of the demo account's password
    #[serde(default)]
    pub demo_password_sha256: Option<String>,

    /// Display name of the demo account
    #[serde(default = "default_demo_name")]
    pub demo_name: String,

    /// Role of the demo account
    #[serde(default = "default_demo_role")]
    pub demo_role: String,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scenesplit")
        .join("session.json")
}

fn default_guest_access_days() -> i64 {
    DEFAULT_GUEST_ACCESS_DAYS
}

fn default_request_timeout() -> u64 {
    30
}

fn default_demo_name() -> String {
    "Demo User".to_string()
}

fn default_demo_role() -> String {
    "ADMIN".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            storage_path: default_storage_path(),
            guest_access_days: default_guest_access_days(),
            request_timeout_secs: default_request_timeout(),
            demo_email: None,
            demo_password_sha256: None,
            demo_name: default_demo_name(),
            demo_role: default_demo_role(),
            log_level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment and an optional config file.
    ///
    /// `explicit` takes the place of the standard file locations and must
    /// exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok());

        let config_path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::var("SCENESPLIT_CONFIG")
                .ok()
                .map(PathBuf::from)
                .or_else(Self::find_config_file),
        };

        if let Some(config_path) = config_path {
            let contents = std::fs::read_to_string(&config_path)?;
            let file_config = toml::from_str::<ClientConfig>(&contents)?;
            // Environment takes precedence
            config.merge_file(file_config);
        }

        Ok(config)
    }

    /// Overrides fields from `SCENESPLIT_*` variables looked up with `var`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("SCENESPLIT_API_URL") {
            self.api_base_url = url;
        }

        if let Some(path) = var("SCENESPLIT_STORAGE_PATH") {
            self.storage_path = PathBuf::from(path);
        }

        if let Some(days) = var("SCENESPLIT_GUEST_ACCESS_DAYS") {
            self.guest_access_days = days.parse().unwrap_or(DEFAULT_GUEST_ACCESS_DAYS);
        }

        if let Some(secs) = var("SCENESPLIT_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = secs.parse().unwrap_or(default_request_timeout());
        }

        if let Some(email) = var("SCENESPLIT_DEMO_EMAIL") {
            self.demo_email = Some(email);
        }

        if let Some(digest) = var("SCENESPLIT_DEMO_PASSWORD_SHA256") {
            self.demo_password_sha256 = Some(digest);
        }

        if let Some(name) = var("SCENESPLIT_DEMO_NAME") {
            self.demo_name = name;
        }

        if let Some(role) = var("SCENESPLIT_DEMO_ROLE") {
            self.demo_role = role;
        }

        if let Some(level) = var("SCENESPLIT_LOG_LEVEL") {
            self.log_level = level;
        }
    }

    /// Takes values from `file` for every field still at its default.
    pub fn merge_file(&mut self, file: ClientConfig) {
        let defaults = Self::default();

        if self.api_base_url == defaults.api_base_url {
            self.api_base_url = file.api_base_url;
        }
        if self.storage_path == defaults.storage_path {
            self.storage_path = file.storage_path;
        }
        if self.guest_access_days == defaults.guest_access_days {
            self.guest_access_days = file.guest_access_days;
        }
        if self.request_timeout_secs == defaults.request_timeout_secs {
            self.request_timeout_secs = file.request_timeout_secs;
        }
        if self.demo_email.is_none() {
            self.demo_email = file.demo_email;
        }
        if self.demo_password_sha256.is_none() {
            self.demo_password_sha256 = file.demo_password_sha256;
        }
        if self.demo_name == defaults.demo_name {
            self.demo_name = file.demo_name;
        }
        if self.demo_role == defaults.demo_role {
            self.demo_role = file.demo_role;
        }
        if self.log_level == defaults.log_level {
            self.log_level = file.log_level;
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let locations = [
            PathBuf::from("scenesplit.toml"),
            PathBuf::from("/etc/scenesplit/client.toml"),
            dirs::config_dir()
                .map(|p| p.join("scenesplit").join("client.toml"))
                .unwrap_or_default(),
        ];

        locations.into_iter().find(|p| p.exists())
    }

    /// The offline demo account, if both its email and password digest are
    /// configured.
    pub fn demo_account(&self) -> Option<StaticCredentials> {
        let email = self.demo_email.as_deref()?;
        let digest = self.demo_password_sha256.as_deref()?;
        let user = User::registered(self.demo_name.clone(), self.demo_role.clone(), email);
        Some(StaticCredentials::new(email, digest, user))
    }

    /// Validity of a new guest session.
    pub fn guest_validity(&self) -> chrono::Duration {
        chrono::Duration::try_days(self.guest_access_days.max(0))
            .unwrap_or_else(|| chrono::Duration::days(DEFAULT_GUEST_ACCESS_DAYS))
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
