//! Core entity definitions for SceneSplit.
//!
//! This crate defines the data types shared across the SceneSplit client:
//! users and their session kind, projects with their display status, and the
//! script breakdown produced by the analysis service.

mod breakdown;
mod project;
mod user;

pub use breakdown::*;
pub use project::*;
pub use user::*;
