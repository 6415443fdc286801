//! Stack-based navigation between the two screens

use serde::{Deserialize, Serialize};
use tracing::info;

/// Screen destinations with their parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    Signup,
    Main { name: String },
}

/// Navigation capability handed to screens
pub trait Navigator {
    /// Replaces the whole stack with `route`
    fn reset_to(&mut self, route: Route);
}

/// Navigation stack; the top entry is the mounted screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationStack {
    routes: Vec<Route>,
}

impl NavigationStack {
    pub fn new(initial: Route) -> Self {
        Self {
            routes: vec![initial],
        }
    }

    pub fn current(&self) -> &Route {
        // The stack is never empty: it is created with one entry and
        // reset_to always leaves exactly one
        &self.routes[self.routes.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.routes.len()
    }

    /// Pushes on top of the current screen
    pub fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Pops the top screen, refusing to empty the stack
    pub fn pop(&mut self) -> Option<Route> {
        if self.routes.len() > 1 {
            self.routes.pop()
        } else {
            None
        }
    }
}

impl Default for NavigationStack {
    fn default() -> Self {
        Self::new(Route::Signup)
    }
}

impl Navigator for NavigationStack {
    fn reset_to(&mut self, route: Route) {
        info!(?route, "navigation reset");
        self.routes.clear();
        self.routes.push(route);
    }
}
