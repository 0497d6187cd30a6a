//! The session guard: the pre-flight check every authenticated call runs.
//!
//! Policy order matters and is easy to get subtly wrong:
//!
//! ```text
//! if valid(access)            -> proceed (no refresh, no disconnect)
//! if !valid(refresh)          -> disconnect (no recovery possible)
//! refreshed = refresh()
//! if !valid(access) || !refreshed -> disconnect
//! else proceed
//! ```
//!
//! Checking the refresh token before using it avoids a pointless refresh
//! round trip when recovery is impossible anyway. Each step is awaited to
//! completion before the next; disconnect never races a refresh in flight.

use std::future::Future;

use anyhow::Result;

use crate::client::ApiClient;
use crate::session::TokenKind;

/// What the guard concluded. Informational only: disconnect has already
/// happened as a side effect by the time `Disconnected` is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardVerdict {
    /// The access token is valid (possibly after a silent refresh).
    Authenticated,
    /// Recovery failed; the session has been disconnected.
    Disconnected,
}

impl ApiClient {
    /// Runs the check/refresh/disconnect sequence.
    ///
    /// Never errors: every failure mode inside degrades to "not valid"
    /// and, when terminal, to a disconnect side effect. Idempotent and
    /// safe to call redundantly; extra calls cost round trips, nothing
    /// else.
    pub async fn ensure_authenticated(&self) -> GuardVerdict {
        if self.is_token_valid(TokenKind::Access).await {
            return GuardVerdict::Authenticated;
        }

        if !self.is_token_valid(TokenKind::Refresh).await {
            tracing::info!("refresh token invalid, disconnecting");
            self.session.disconnect();
            return GuardVerdict::Disconnected;
        }

        let refreshed = self.refresh_access_token().await;
        if !self.is_token_valid(TokenKind::Access).await || !refreshed {
            tracing::info!("access token unrecoverable after refresh, disconnecting");
            self.session.disconnect();
            return GuardVerdict::Disconnected;
        }

        GuardVerdict::Authenticated
    }

    /// Wraps one authenticated request with the session guard.
    ///
    /// This is the single place the guard runs; service calls must not
    /// invoke it themselves. Disconnect is fire-and-forget: a failed
    /// guard still lets the request go out doomed, because the pending
    /// navigation makes its result moot.
    pub(crate) async fn guarded<F, Fut, T>(&self, call: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let _ = self.ensure_authenticated().await;
        call().await
    }
}
