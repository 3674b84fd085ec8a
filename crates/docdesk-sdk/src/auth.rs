//! Session token context
//!
//! One process-wide context holds the bearer token. It starts empty, is
//! filled by [`AuthContext::init`] and emptied by [`AuthContext::clear`].
//! Clients read it on every request, so a login or logout is seen by every
//! client sharing the context.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

static GLOBAL: LazyLock<AuthContext> = LazyLock::new(AuthContext::new);

#[derive(Clone, Default)]
pub struct AuthContext {
    token: Arc<RwLock<Option<String>>>,
}

impl AuthContext {
    /// A context independent of the process-wide one
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> Self {
        GLOBAL.clone()
    }

    pub fn init(&self, token: impl Into<String>) {
        let token = token.into().trim().to_string();
        *self.token.write() = (!token.is_empty()).then_some(token);
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_and_clear() {
        let auth = AuthContext::new();
        assert!(!auth.is_authenticated());

        auth.init(" abc ");
        assert_eq!(auth.token().as_deref(), Some("abc"));

        let shared = auth.clone();
        shared.clear();
        assert!(auth.token().is_none());
    }

    #[test]
    fn test_blank_token_is_no_session() {
        let auth = AuthContext::new();
        auth.init("   ");
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_global_is_shared() {
        let a = AuthContext::global();
        let b = AuthContext::global();
        assert!(Arc::ptr_eq(&a.token, &b.token));
    }
}
