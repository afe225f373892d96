//! Route table and the protected-route guard.

use std::sync::Arc;

use tokio::sync::watch;

use crate::auth::AuthStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Projects,
    ProjectDetail(String),
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim();
        let segments: Vec<&str> = trimmed
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Dashboard,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["projects"] => Route::Projects,
            ["projects", id] => Route::ProjectDetail((*id).to_string()),
            _ => Route::NotFound(trimmed.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/".to_string(),
            Route::Projects => "/projects".to_string(),
            Route::ProjectDetail(id) => format!("/projects/{}", id),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Routes that render only with a session.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::Dashboard | Route::Projects | Route::ProjectDetail(_)
        )
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Resolve where a navigation actually lands.
pub fn guard(route: Route, authenticated: bool) -> Route {
    if route.is_protected() && !authenticated {
        Route::Login
    } else {
        route
    }
}

/// Holds the current route. Navigation through `navigate` is guarded;
/// `redirect_to_login` is the forced path used when a session dies.
pub struct Navigator {
    current: watch::Sender<Route>,
    auth: Arc<AuthStore>,
}

impl Navigator {
    pub fn new(auth: Arc<AuthStore>) -> Self {
        let (current, _) = watch::channel(Route::Dashboard);
        Self { current, auth }
    }

    pub fn current(&self) -> Route {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }

    /// Move to `route`, or to `/login` when it needs a session that is missing.
    pub fn navigate(&self, route: Route) -> Route {
        let resolved = guard(route, self.auth.is_authenticated());
        tracing::debug!("Navigating to {}", resolved);
        self.current.send_replace(resolved.clone());
        resolved
    }

    pub fn navigate_path(&self, path: &str) -> Route {
        self.navigate(Route::parse(path))
    }

    pub fn redirect_to_login(&self) {
        let previous = self.current.send_replace(Route::Login);
        if previous != Route::Login {
            tracing::info!("Redirected from {} to /login", previous);
        }
    }
}
