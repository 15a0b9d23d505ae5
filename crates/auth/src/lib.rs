//! Session state and credential checks for SceneSplit.
//!
//! This crate provides:
//! - The session state machine (logged-in flag, current user, guest expiry)
//! - Restoring a session from its stored representation
//! - A configured single-account credential check for demo deployments

mod credentials;
mod error;
mod session;

pub use credentials::*;
pub use error::*;
pub use session::*;

/// Default length of a guest session in days.
pub const DEFAULT_GUEST_ACCESS_DAYS: i64 = 7;
