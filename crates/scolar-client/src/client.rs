//! The API client handle.

use std::sync::Arc;

use anyhow::{Context, Result};
use url::Url;

use crate::config::Config;
use crate::session::{SessionStore, TokenKind};

/// Client for the remote school-management API.
///
/// Cheap to clone per call site via the shared session handle; all
/// authenticated requests go through [`ApiClient::guarded`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) session: Arc<SessionStore>,
}

impl ApiClient {
    /// Creates a client from config with an injected session store.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &Config, session: Arc<SessionStore>) -> Result<Self> {
        let base_url = Url::parse(&config.api_url)
            .with_context(|| format!("Invalid API base URL: {}", config.api_url))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// The session store this client authenticates with.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Resolves an endpoint path against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Invalid endpoint path: {path}"))
    }

    /// Current access token for the Authorization header.
    ///
    /// Empty when absent: a guarded call that lost its session still goes
    /// out (and is rejected server-side); the pending disconnect makes the
    /// response moot.
    pub(crate) fn bearer(&self) -> String {
        self.session.get(TokenKind::Access).unwrap_or_default()
    }
}
