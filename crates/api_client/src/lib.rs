//! HTTP client for the SceneSplit API
//!
//! The [`AuthApi`] and [`ProjectsApi`] traits describe the remote service as
//! the client state layer uses it. [`HttpApiClient`] implements both over
//! HTTP with reqwest; tests substitute their own implementations.

mod error;
mod http;
mod traits;
mod types;

pub use error::*;
pub use http::*;
pub use traits::*;
pub use types::*;
