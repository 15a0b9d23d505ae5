//! Terminal stand-in for the client's router.

use project_store::{Navigator, Route};
use tracing::info;

/// A terminal has no views to switch, so view changes are only logged.
#[derive(Debug, Default)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, route: Route) {
        info!(route = %route, "Navigate");
    }
}
