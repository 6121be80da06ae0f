//! Change notification for agent observers
//!
//! Listeners receive a payload-free "changed" signal after each mutating
//! agent call. They run synchronously and must not call back into the
//! agent's mutating API.

use std::fmt;

/// Listener invoked after an agent changed
pub type Listener = Box<dyn FnMut()>;

/// Ordered list of listeners
#[derive(Default)]
pub struct Observers {
    listeners: Vec<Listener>,
}

impl Observers {
    /// Register a listener
    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    /// Call every listener in registration order
    pub fn notify(&mut self) {
        for listener in &mut self.listeners {
            listener();
        }
    }

    /// Number of registered listeners
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
