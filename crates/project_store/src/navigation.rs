//! Navigation between the client's views.

use std::sync::Mutex;

/// Views the auth flow moves between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Project list shown after sign-in.
    Projects,
    /// Sign-in view.
    Login,
}

impl Route {
    /// Route name as registered with the router.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Projects => "ProjectsView",
            Self::Login => "Login",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Router the auth flow reports view changes to.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that only records where it was sent.
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    history: Mutex<Vec<Route>>,
}

impl MemoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes visited so far, oldest first.
    pub fn history(&self) -> Vec<Route> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }

    /// Most recent route.
    pub fn current(&self) -> Option<Route> {
        self.history().last().copied()
    }
}

impl Navigator for MemoryNavigator {
    fn navigate(&self, route: Route) {
        if let Ok(mut history) = self.history.lock() {
            history.push(route);
        }
    }
}
