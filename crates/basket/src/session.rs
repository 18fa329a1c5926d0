//! # Session Binding
//!
//! The basket is tied to a browser session through exactly one key in the
//! application's session store: [`BASKET_SESSION_KEY`] holds the persisted
//! basket's numeric id. No key means no bound basket.
//!
//! The store itself belongs to the host application (cookie-backed, Redis,
//! whatever); the manager only needs the narrow [`SessionStore`] view of
//! it, injected at construction. [`MemorySessionStore`] is the reference
//! implementation used by tests and the demo.

use std::collections::HashMap;

/// The single session key this crate owns.
pub const BASKET_SESSION_KEY: &str = "basket";

/// The manager's view of the host application's session store.
pub trait SessionStore {
    /// The currently bound basket id, if any.
    fn basket_id(&self) -> Option<i64>;

    /// Binds a persisted basket to this session.
    fn remember_basket(&mut self, basket_id: i64);

    /// Removes the binding (basket destroyed or never persisted).
    fn forget_basket(&mut self);
}

/// In-memory session store backed by a plain key-value map.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    values: HashMap<String, String>,
}

impl MemorySessionStore {
    /// Creates an empty session store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn basket_id(&self) -> Option<i64> {
        self.values
            .get(BASKET_SESSION_KEY)
            .and_then(|value| value.parse().ok())
    }

    fn remember_basket(&mut self, basket_id: i64) {
        self.values
            .insert(BASKET_SESSION_KEY.to_string(), basket_id.to_string());
    }

    fn forget_basket(&mut self) {
        self.values.remove(BASKET_SESSION_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remember_and_forget() {
        let mut session = MemorySessionStore::new();
        assert_eq!(session.basket_id(), None);

        session.remember_basket(42);
        assert_eq!(session.basket_id(), Some(42));

        session.remember_basket(7);
        assert_eq!(session.basket_id(), Some(7));

        session.forget_basket();
        assert_eq!(session.basket_id(), None);
    }
}
