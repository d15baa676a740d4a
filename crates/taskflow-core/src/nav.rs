//! Navigation targets and the sink that front ends implement.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use taskflow_types::Id;

/// Entry points the client can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    /// Authenticated landing route.
    Dashboard,
    Projects,
    Project(Id),
    Tasks,
    Subscription,
}

impl Route {
    pub fn path(self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Projects => "/projects".to_string(),
            Route::Project(id) => format!("/projects/{id}"),
            Route::Tasks => "/tasks".to_string(),
            Route::Subscription => "/subscription".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Receives navigation requests from the client and session.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Ignores every navigation request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _route: Route) {}
}

/// Remembers every navigation request in order.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}
