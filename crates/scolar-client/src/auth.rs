//! Authentication calls: login, token validation, token refresh.
//!
//! The validator and refresher are fail-closed: any transport failure,
//! bad status, or malformed body collapses to "not valid" / "not
//! refreshed". The distinction survives only in debug logs; callers never
//! see it (an ambiguous outcome must not grant continued access).

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::client::ApiClient;
use crate::logging::mask_token;
use crate::outcome::Outcome;
use crate::session::TokenKind;

#[derive(Debug, Deserialize)]
struct CheckResponse {
    valid: bool,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
}

impl ApiClient {
    /// Logs in with username/password. On 200/201 both tokens are stored.
    ///
    /// Non-success statuses are returned as a classified [`Outcome`] for
    /// the caller to report; only transport/decoding failures are errors.
    ///
    /// # Errors
    /// Returns an error if the request cannot be sent or a success body
    /// cannot be decoded.
    pub async fn login(&self, username: &str, password: &str) -> Result<Outcome> {
        self.login_request(
            "auth/login",
            &serde_json::json!({ "username": username, "password": password }),
        )
        .await
    }

    /// First login: sets the account password while authenticating.
    ///
    /// # Errors
    /// Returns an error if the request cannot be sent or a success body
    /// cannot be decoded.
    pub async fn first_login(
        &self,
        username: &str,
        password: &str,
        new_password: &str,
    ) -> Result<Outcome> {
        self.login_request(
            "auth/first_login",
            &serde_json::json!({
                "username": username,
                "password": password,
                "new_password": new_password,
            }),
        )
        .await
    }

    async fn login_request(&self, path: &str, body: &serde_json::Value) -> Result<Outcome> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send login request")?;

        let status = response.status();
        if !status.is_success() {
            let detail = read_detail(response).await;
            return Ok(Outcome::classify(status.as_u16(), detail));
        }

        let tokens: LoginResponse = response
            .json()
            .await
            .context("Failed to parse login response")?;
        tracing::info!(access = %mask_token(&tokens.access_token), "login succeeded");
        self.session
            .set_pair(tokens.access_token, tokens.refresh_token);
        Ok(Outcome::classify(status.as_u16(), None))
    }

    /// Asks the server whether the stored token of this kind is valid.
    ///
    /// Absent token: false without a network call. Non-200, transport
    /// failure, or `valid: false` all collapse to false. Never errors.
    pub async fn is_token_valid(&self, kind: TokenKind) -> bool {
        let Some(token) = self.session.get(kind) else {
            return false;
        };
        match self.check_token(kind, &token).await {
            Ok(valid) => valid,
            Err(err) => {
                // Transport failure and semantic invalidity are the same
                // answer at this layer; only the log keeps them apart.
                tracing::debug!(kind = kind.as_str(), error = %format!("{err:#}"), "token check failed");
                false
            }
        }
    }

    async fn check_token(&self, kind: TokenKind, token: &str) -> Result<bool> {
        let path = match kind {
            TokenKind::Access => "auth/check/token/access",
            TokenKind::Refresh => "auth/check/token/refresh",
        };
        let url = self.endpoint(path)?;
        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await
            .context("Failed to send token check request")?;

        if !response.status().is_success() {
            return Ok(false);
        }

        let body: CheckResponse = response
            .json()
            .await
            .context("Failed to parse token check response")?;
        Ok(body.valid)
    }

    /// Exchanges the stored refresh token for a new access token.
    ///
    /// On success the stored access token is overwritten and true is
    /// returned. On any failure the store is left untouched; deciding to
    /// disconnect is the guard's job, never this function's.
    pub async fn refresh_access_token(&self) -> bool {
        let Some(refresh) = self.session.get(TokenKind::Refresh) else {
            return false;
        };
        match self.request_refresh(&refresh).await {
            Ok(access) => {
                tracing::debug!(access = %mask_token(&access), "access token refreshed");
                self.session.set(TokenKind::Access, access);
                true
            }
            Err(err) => {
                tracing::debug!(error = %format!("{err:#}"), "token refresh failed");
                false
            }
        }
    }

    async fn request_refresh(&self, refresh_token: &str) -> Result<String> {
        let url = self.endpoint("auth/refresh")?;
        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .context("Failed to send token refresh request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Token refresh failed (HTTP {status})");
        }

        let body: RefreshResponse = response
            .json()
            .await
            .context("Failed to parse token refresh response")?;
        Ok(body.access_token)
    }
}

/// Pulls a human-oriented detail string out of an error body, if any.
pub(crate) async fn read_detail(response: reqwest::Response) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(alias = "message")]
        detail: Option<String>,
    }
    response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.detail)
}
