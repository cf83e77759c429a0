//! Navigation Layer
//!
//! Explicit screen routing. The navigator owns the back stack and is
//! passed to whoever drives the screens; there is no process-wide
//! current-screen singleton.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// The screens of the application
///
/// `Recipe` carries the meal id to show, so detail navigation needs no
/// shared mutable slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    SignUp,
    Login,
    Home,
    Recipe(String),
    Favorites,
    Profile,
}

/// Owns the navigation back stack and publishes the top screen
pub struct Navigator {
    stack: Vec<Screen>,
    current: watch::Sender<Screen>,
}

impl Navigator {
    pub fn new(start: Screen) -> Self {
        let (current, _) = watch::channel(start.clone());
        Self {
            stack: vec![start],
            current,
        }
    }

    pub fn current(&self) -> Screen {
        self.current.borrow().clone()
    }

    /// Observe the top screen as it changes
    pub fn subscribe(&self) -> watch::Receiver<Screen> {
        self.current.subscribe()
    }

    /// Push a destination onto the stack
    pub fn navigate_to(&mut self, destination: Screen) {
        self.stack.push(destination.clone());
        self.current.send_replace(destination);
    }

    /// Swap the top of the stack (login -> home style transitions)
    pub fn replace(&mut self, destination: Screen) {
        self.stack.pop();
        self.stack.push(destination.clone());
        self.current.send_replace(destination);
    }

    /// Go back one screen; refuses to pop the root
    pub fn pop(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        self.stack.pop();
        if let Some(top) = self.stack.last() {
            self.current.send_replace(top.clone());
        }
        true
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
