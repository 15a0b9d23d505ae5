//! Project and session state for the SceneSplit client
//!
//! [`ProjectStore`] is the single state container of the client. It is built
//! by the application root with its storage and remote API injected, and
//! shared by `Arc`. [`AuthHelper`] layers sign-in, sign-out and navigation on
//! top of it.

mod auth_helper;
mod error;
mod loading;
mod navigation;
mod store;
mod transform;

pub use auth_helper::*;
pub use error::*;
pub use loading::*;
pub use navigation::*;
pub use store::*;
pub use transform::*;
