//! Session state.
//!
//! [`SessionState`] holds only in-memory transitions. Persisting it is the
//! caller's job, see [`SessionState::user_json`] and [`SessionState::restore`].

use chrono::{DateTime, Utc};
use entities::User;

use crate::{AuthError, AuthResult};

/// Stored value of the logged-in flag when set.
pub const LOGGED_IN_FLAG: &str = "true";

/// Stored value of the logged-in flag when cleared.
pub const LOGGED_OUT_FLAG: &str = "false";

/// Login flag and current user.
///
/// The state is only ever logged in together with a user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    is_logged_in: bool,
    user: Option<User>,
}

impl SessionState {
    /// Creates a logged-out state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a session from stored values.
    ///
    /// Without a stored user the session is logged out regardless of the flag.
    pub fn restore(logged_in_flag: Option<&str>, user_json: Option<&str>) -> AuthResult<Self> {
        let Some(user_json) = user_json else {
            return Ok(Self::default());
        };

        let user: User = serde_json::from_str(user_json)?;
        if !user.is_consistent() {
            return Err(AuthError::InvalidUserRecord(format!(
                "{} has type {:?} but expiresAt is {:?}",
                user.email, user.user_type, user.expires_at
            )));
        }

        Ok(Self {
            is_logged_in: logged_in_flag == Some(LOGGED_IN_FLAG),
            user: Some(user),
        })
    }

    /// Signs `user` in.
    pub fn sign_in(&mut self, user: User) {
        self.user = Some(user);
        self.is_logged_in = true;
    }

    /// Replaces the current user without touching the login flag.
    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Ends the session.
    pub fn sign_out(&mut self) {
        self.is_logged_in = false;
        self.user = None;
    }

    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Stored value of the logged-in flag.
    pub fn logged_in_flag(&self) -> &'static str {
        if self.is_logged_in {
            LOGGED_IN_FLAG
        } else {
            LOGGED_OUT_FLAG
        }
    }

    /// Current user encoded for storage, if any.
    pub fn user_json(&self) -> AuthResult<Option<String>> {
        self.user
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(AuthError::from)
    }

    /// Returns true if the current user is a guest.
    pub fn is_guest_user(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_guest)
    }

    /// Returns true if the current user is a guest whose access ended before `now`.
    pub fn guest_access_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| user.access_expired_at(now))
    }

    /// Days of guest access left at `now`; zero for registered or absent users.
    pub fn days_until_guest_expiry_at(&self, now: DateTime<Utc>) -> i64 {
        self.user
            .as_ref()
            .map_or(0, |user| user.days_until_expiry_at(now))
    }
}
