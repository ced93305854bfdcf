use std::sync::Arc;

use tracing::{info, warn};

use super::TokenStore;

/// Immutable view of the authentication state.
///
/// Produced once at startup by [`AuthState::initialize`] and on demand by
/// [`AuthState::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthSnapshot {
    token: Option<String>,
}

impl AuthSnapshot {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Login state owned by the application root.
///
/// `login_success` and `logout` are the only mutators. Both write through
/// to the token store before returning.
pub struct AuthState {
    token: Option<String>,
    store: Arc<dyn TokenStore>,
}

impl AuthState {
    /// Read the token store once and capture the result.
    pub fn initialize(store: &dyn TokenStore) -> AuthSnapshot {
        AuthSnapshot::new(store.get())
    }

    pub fn from_snapshot(snapshot: AuthSnapshot, store: Arc<dyn TokenStore>) -> Self {
        Self {
            token: snapshot.token,
            store,
        }
    }

    /// Initialize from the store and build the container in one step
    pub fn load(store: Arc<dyn TokenStore>) -> Self {
        let snapshot = Self::initialize(store.as_ref());
        Self::from_snapshot(snapshot, store)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            token: self.token.clone(),
        }
    }

    /// Record a successful login and persist the token.
    ///
    /// A persistence failure is logged; the in-memory state still moves to
    /// authenticated. An empty token is not a session and is ignored.
    pub fn login_success(&mut self, token: impl Into<String>) {
        let token = token.into();
        if token.is_empty() {
            warn!("Ignoring empty login token");
            return;
        }
        if let Err(e) = self.store.set(&token) {
            warn!(error = %e, "Failed to persist token");
        }
        self.token = Some(token);
        info!("Logged in");
    }

    /// Forget the token in memory and in the store.
    pub fn logout(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored token");
        }
        self.token = None;
        info!("Logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;

    #[test]
    fn test_initialize_from_empty_store() {
        let store = MemoryTokenStore::new();
        let snapshot = AuthState::initialize(&store);
        assert!(!snapshot.is_authenticated());
        assert_eq!(snapshot.token(), None);
    }

    #[test]
    fn test_initialize_from_stored_token() {
        let store = MemoryTokenStore::with_token("abc");
        let snapshot = AuthState::initialize(&store);
        assert!(snapshot.is_authenticated());
        assert_eq!(snapshot.token(), Some("abc"));
    }

    #[test]
    fn test_empty_stored_token_is_unauthenticated() {
        let store = MemoryTokenStore::with_token("");
        assert!(!AuthState::initialize(&store).is_authenticated());
    }

    #[test]
    fn test_login_success_persists_token() {
        let store = Arc::new(MemoryTokenStore::new());
        let mut auth = AuthState::load(store.clone());
        assert!(!auth.is_authenticated());

        auth.login_success("t1");
        assert!(auth.is_authenticated());
        assert_eq!(auth.token(), Some("t1"));
        assert_eq!(store.get().as_deref(), Some("t1"));
    }

    #[test]
    fn test_login_success_ignores_empty_token() {
        let store = Arc::new(MemoryTokenStore::new());
        let mut auth = AuthState::load(store.clone());

        auth.login_success("");
        assert!(!auth.is_authenticated());
        assert_eq!(auth.token(), None);
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_empty_token_keeps_existing_session() {
        let store = Arc::new(MemoryTokenStore::with_token("t1"));
        let mut auth = AuthState::load(store.clone());

        auth.login_success(String::new());
        assert_eq!(auth.token(), Some("t1"));
        assert_eq!(store.get().as_deref(), Some("t1"));
    }

    #[test]
    fn test_logout_clears_store() {
        let store = Arc::new(MemoryTokenStore::with_token("t1"));
        let mut auth = AuthState::load(store.clone());
        assert!(auth.is_authenticated());

        auth.logout();
        assert!(!auth.is_authenticated());
        assert_eq!(auth.token(), None);
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_snapshot_tracks_mutations() {
        let store = Arc::new(MemoryTokenStore::new());
        let mut auth = AuthState::load(store);
        let before = auth.snapshot();

        auth.login_success("abc");
        let after = auth.snapshot();

        assert_ne!(before, after);
        assert_eq!(after, AuthSnapshot::new(Some("abc".to_string())));
        // The old snapshot is unaffected
        assert!(!before.is_authenticated());
    }

    #[test]
    fn test_state_survives_store_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn TokenStore> =
            Arc::new(crate::auth::FileTokenStore::new(dir.path().to_path_buf()));

        let mut first = AuthState::load(Arc::clone(&store));
        first.login_success("durable");

        let second = AuthState::load(store);
        assert_eq!(second.token(), Some("durable"));
    }
}
