use std::sync::{Mutex, PoisonError};

use tracing::debug;

/// The two navigable views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Employees,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Employees => "/employees",
        }
    }

    /// Where an app start lands: the list when a session exists, otherwise login.
    pub fn initial(authenticated: bool) -> Self {
        if authenticated {
            Self::Employees
        } else {
            Self::Login
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
    fn current(&self) -> Route;
}

/// Navigator that only tracks the active route; the terminal front end renders from it.
pub struct RouteTracker {
    current: Mutex<Route>,
}

impl RouteTracker {
    pub fn new(initial: Route) -> Self {
        Self {
            current: Mutex::new(initial),
        }
    }
}

impl Navigator for RouteTracker {
    fn navigate(&self, route: Route) {
        debug!(path = route.path(), "navigate");
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = route;
    }

    fn current(&self) -> Route {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "tests/navigation_tests.rs"]
mod tests;
