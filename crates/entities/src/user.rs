//! User-related entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Kind of session a user holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// A user with a real account. Access does not expire.
    Registered,
    /// A time-bounded visitor.
    Guest,
}

/// A signed-in user as seen by the client.
///
/// `expires_at` is set exactly when `user_type` is [`UserType::Guest`]. The
/// constructors uphold this; records read back from storage should be checked
/// with [`User::is_consistent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Display name.
    pub name: String,
    /// Role label as reported by the server.
    pub role: String,
    /// Email address.
    pub email: String,
    /// Session kind.
    #[serde(rename = "type")]
    pub user_type: UserType,
    /// End of the guest access window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a registered user.
    pub fn registered(
        name: impl Into<String>,
        role: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            email: email.into(),
            user_type: UserType::Registered,
            expires_at: None,
        }
    }

    /// Creates a guest user whose access ends at `expires_at`.
    pub fn guest(
        name: impl Into<String>,
        role: impl Into<String>,
        email: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            email: email.into(),
            user_type: UserType::Guest,
            expires_at: Some(expires_at),
        }
    }

    /// Returns true if this is a guest user.
    pub fn is_guest(&self) -> bool {
        self.user_type == UserType::Guest
    }

    /// Returns true if the expiry field agrees with the user type.
    pub fn is_consistent(&self) -> bool {
        self.is_guest() == self.expires_at.is_some()
    }

    /// Returns true if this is a guest whose access window closed before `now`.
    pub fn access_expired_at(&self, now: DateTime<Utc>) -> bool {
        match (self.user_type, self.expires_at) {
            (UserType::Guest, Some(expires_at)) => now > expires_at,
            _ => false,
        }
    }

    /// Whole days of guest access left at `now`, rounded up and floored at zero.
    ///
    /// Registered users always report zero.
    pub fn days_until_expiry_at(&self, now: DateTime<Utc>) -> i64 {
        let expires_at = match (self.user_type, self.expires_at) {
            (UserType::Guest, Some(expires_at)) => expires_at,
            _ => return 0,
        };

        let remaining = (expires_at - now).num_milliseconds();
        if remaining <= 0 {
            return 0;
        }
        (remaining + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
    }
}
