//! Navigation gate and the two route trees it switches between.
//!
//! SYSTEM CONTEXT
//! ==============
//! The gate starts `Undetermined` (rendered as a loading indicator) and
//! settles once the session store has read its marker. From then on it
//! follows every session change: signing in swaps in the app tree, signing
//! out swaps the auth tree back. Each swap starts the new tree at its root.
//!
//! The gate only observes. It never calls the auth service and never mutates
//! the session.

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

use std::mem;

use tokio::sync::watch;

use super::session::SessionStatus;

// =============================================================================
// ROUTES
// =============================================================================

/// Screens reachable while signed out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthRoute {
    Home,
    Login,
    Register,
    VerifyEmail { email: String },
}

/// Screens reachable while signed in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppRoute {
    Dashboard,
}

/// A navigation stack rooted at its initial route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stack<R> {
    routes: Vec<R>,
}

impl<R> Stack<R> {
    #[must_use]
    pub fn new(initial: R) -> Self {
        Self { routes: vec![initial] }
    }

    #[must_use]
    pub fn current(&self) -> &R {
        // The root is never popped.
        &self.routes[self.routes.len() - 1]
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.routes.len()
    }

    /// Go to `route`. If a route of the same kind is already on the stack,
    /// pop back to it and replace its parameters; otherwise push.
    pub fn navigate(&mut self, route: R) {
        let kind = mem::discriminant(&route);
        if let Some(pos) = self.routes.iter().position(|r| mem::discriminant(r) == kind) {
            self.routes.truncate(pos);
        }
        self.routes.push(route);
    }

    /// Pop the current route. Returns `false` at the root.
    pub fn go_back(&mut self) -> bool {
        if self.routes.len() <= 1 {
            return false;
        }
        self.routes.pop();
        true
    }
}

impl Default for Stack<AuthRoute> {
    fn default() -> Self {
        Self::new(AuthRoute::Home)
    }
}

impl Default for Stack<AppRoute> {
    fn default() -> Self {
        Self::new(AppRoute::Dashboard)
    }
}

// =============================================================================
// GATE
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    Undetermined,
    Unauthenticated,
    Authenticated,
}

impl From<SessionStatus> for GateState {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Unknown => Self::Undetermined,
            SessionStatus::Inactive => Self::Unauthenticated,
            SessionStatus::Active => Self::Authenticated,
        }
    }
}

/// The route tree currently on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActiveTree {
    Loading,
    Auth(Stack<AuthRoute>),
    App(Stack<AppRoute>),
}

impl ActiveTree {
    fn for_state(state: GateState) -> Self {
        match state {
            GateState::Undetermined => Self::Loading,
            GateState::Unauthenticated => Self::Auth(Stack::default()),
            GateState::Authenticated => Self::App(Stack::default()),
        }
    }
}

pub struct NavigationGate {
    session: watch::Receiver<SessionStatus>,
    state: GateState,
    tree: ActiveTree,
}

impl NavigationGate {
    /// Build a gate that follows `session`, starting from its current value.
    #[must_use]
    pub fn new(mut session: watch::Receiver<SessionStatus>) -> Self {
        let state = GateState::from(*session.borrow_and_update());
        Self { session, state, tree: ActiveTree::for_state(state) }
    }

    #[must_use]
    pub fn state(&self) -> GateState {
        self.state
    }

    #[must_use]
    pub fn tree(&self) -> &ActiveTree {
        &self.tree
    }

    /// The signed-out stack, if it is the active tree.
    pub fn auth_stack_mut(&mut self) -> Option<&mut Stack<AuthRoute>> {
        match &mut self.tree {
            ActiveTree::Auth(stack) => Some(stack),
            _ => None,
        }
    }

    /// The signed-in stack, if it is the active tree.
    pub fn app_stack_mut(&mut self) -> Option<&mut Stack<AppRoute>> {
        match &mut self.tree {
            ActiveTree::App(stack) => Some(stack),
            _ => None,
        }
    }

    /// Apply any pending session notification without waiting. Returns `true`
    /// when the active tree was swapped.
    pub fn refresh(&mut self) -> bool {
        match self.session.has_changed() {
            Ok(true) => {
                let status = *self.session.borrow_and_update();
                self.evaluate(status)
            }
            Ok(false) | Err(_) => false,
        }
    }

    /// Wait for the next session notification and apply it. Returns the new
    /// state, or `None` once the session store is gone.
    pub async fn changed(&mut self) -> Option<GateState> {
        self.session.changed().await.ok()?;
        let status = *self.session.borrow_and_update();
        self.evaluate(status);
        Some(self.state)
    }

    fn evaluate(&mut self, status: SessionStatus) -> bool {
        let next = GateState::from(status);
        if next == self.state {
            return false;
        }
        tracing::info!(from = ?self.state, to = ?next, "navigation tree switched");
        self.state = next;
        self.tree = ActiveTree::for_state(next);
        true
    }
}
