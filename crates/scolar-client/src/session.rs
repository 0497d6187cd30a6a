//! Session token storage and disconnect signalling.
//!
//! Tokens live in process memory only. A session existing is not a claim
//! of validity: the server is the sole authority on expiry, so callers
//! always re-check through the guard before relying on a token.

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

/// Which of the two bearer tokens a call refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived token presented on every authenticated request.
    Access,
    /// Longer-lived token used solely to mint a new access token.
    Refresh,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

#[derive(Debug, Default)]
struct Tokens {
    access: Option<String>,
    refresh: Option<String>,
}

/// Shared, ephemeral store for the session's token pair.
///
/// An explicit handle injected into the client rather than ambient global
/// state. The `disconnected` token turns repeated disconnects into a
/// single observable "navigate to login" signal.
#[derive(Debug, Default)]
pub struct SessionStore {
    tokens: Mutex<Tokens>,
    /// Re-armed with a fresh token when a new pair is stored, so each
    /// session gets its own disconnect signal.
    disconnected: Mutex<CancellationToken>,
}

impl SessionStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns the stored token of the given kind, if present and non-empty.
    pub fn get(&self, kind: TokenKind) -> Option<String> {
        let tokens = self.tokens.lock().expect("session store poisoned");
        let value = match kind {
            TokenKind::Access => tokens.access.as_deref(),
            TokenKind::Refresh => tokens.refresh.as_deref(),
        };
        value.filter(|v| !v.is_empty()).map(str::to_string)
    }

    /// Overwrites the stored token of the given kind.
    pub fn set(&self, kind: TokenKind, value: impl Into<String>) {
        let mut tokens = self.tokens.lock().expect("session store poisoned");
        let slot = match kind {
            TokenKind::Access => &mut tokens.access,
            TokenKind::Refresh => &mut tokens.refresh,
        };
        *slot = Some(value.into());
    }

    /// Stores a freshly issued token pair (login / first login) and arms
    /// a new disconnect signal for the session it starts.
    pub fn set_pair(&self, access: impl Into<String>, refresh: impl Into<String>) {
        let mut tokens = self.tokens.lock().expect("session store poisoned");
        tokens.access = Some(access.into());
        tokens.refresh = Some(refresh.into());
        drop(tokens);

        let mut disconnected = self.disconnected.lock().expect("session store poisoned");
        if disconnected.is_cancelled() {
            *disconnected = CancellationToken::new();
        }
    }

    /// Removes both tokens. Clearing an empty store is a no-op.
    pub fn clear(&self) {
        let mut tokens = self.tokens.lock().expect("session store poisoned");
        *tokens = Tokens::default();
    }

    /// Terminal logout: clears the store and fires the disconnect signal.
    ///
    /// Idempotent: calling this any number of times, from any task,
    /// produces at most one observable navigation (the token only
    /// transitions once).
    pub fn disconnect(&self) {
        self.clear();
        self.disconnected
            .lock()
            .expect("session store poisoned")
            .cancel();
    }

    /// True once `disconnect` has been called for the current session.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
            .lock()
            .expect("session store poisoned")
            .is_cancelled()
    }

    /// Token observers can await to react to a forced logout.
    pub fn disconnect_signal(&self) -> CancellationToken {
        self.disconnected
            .lock()
            .expect("session store poisoned")
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_clear() {
        let store = SessionStore::new();
        assert!(store.get(TokenKind::Access).is_none());

        store.set(TokenKind::Access, "a1");
        store.set(TokenKind::Refresh, "r1");
        assert_eq!(store.get(TokenKind::Access).as_deref(), Some("a1"));
        assert_eq!(store.get(TokenKind::Refresh).as_deref(), Some("r1"));

        store.set(TokenKind::Access, "a2");
        assert_eq!(store.get(TokenKind::Access).as_deref(), Some("a2"));

        store.clear();
        assert!(store.get(TokenKind::Access).is_none());
        assert!(store.get(TokenKind::Refresh).is_none());
    }

    #[test]
    fn test_empty_string_reads_as_absent() {
        let store = SessionStore::new();
        store.set(TokenKind::Access, "");
        assert!(store.get(TokenKind::Access).is_none());
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let store = SessionStore::new();
        store.set_pair("a", "r");

        store.disconnect();
        assert!(store.is_disconnected());
        assert!(store.get(TokenKind::Access).is_none());

        // Second disconnect: store stays empty, signal already fired.
        store.disconnect();
        assert!(store.is_disconnected());
        assert!(store.get(TokenKind::Refresh).is_none());
    }

    #[test]
    fn test_new_pair_arms_a_fresh_disconnect_signal() {
        let store = SessionStore::new();
        store.set_pair("a1", "r1");
        let first = store.disconnect_signal();
        store.disconnect();
        assert!(first.is_cancelled());

        // Logging in again starts a new session with its own signal.
        store.set_pair("a2", "r2");
        assert!(!store.is_disconnected());
        assert!(!store.disconnect_signal().is_cancelled());
    }

    #[tokio::test]
    async fn test_disconnect_signal_observable() {
        let store = SessionStore::new();
        let signal = store.disconnect_signal();
        assert!(!signal.is_cancelled());

        store.disconnect();
        signal.cancelled().await; // resolves immediately
        assert!(signal.is_cancelled());
    }
}
