//! SceneSplit command-line client library
//!
//! This module exposes the client components for use by the binary and for
//! testing.

pub mod config;
pub mod navigation;
pub mod output;
pub mod prompt;

pub use config::{ClientConfig, ConfigError};
pub use navigation::LoggingNavigator;
