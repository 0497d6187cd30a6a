//! Typed calls for each API resource.
//!
//! Every function here goes through [`ApiClient::guarded`], so the
//! session guard runs exactly once per request. Queries return typed
//! data; mutations return a classified [`Outcome`] for the UI to report.

pub mod attendance;
pub mod formations;
pub mod payments;
pub mod qr;
pub mod students;
pub mod teachers;

use anyhow::{Context, Result};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::read_detail;
use crate::client::ApiClient;
use crate::outcome::Outcome;

impl ApiClient {
    /// Guarded GET returning a JSON list.
    pub(crate) async fn guarded_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        self.guarded(|| async {
            let url = self.endpoint(path)?;
            let response = self
                .http
                .get(url)
                .bearer_auth(self.bearer())
                .send()
                .await
                .with_context(|| format!("Failed to fetch {path}"))?;

            let status = response.status();
            if !status.is_success() {
                anyhow::bail!("Fetching {path} failed (HTTP {status})");
            }
            response
                .json()
                .await
                .with_context(|| format!("Failed to parse {path} response"))
        })
        .await
    }

    /// Guarded mutation returning the classified outcome.
    pub(crate) async fn guarded_mutation<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Outcome>
    where
        B: Serialize + ?Sized,
    {
        self.guarded(|| async {
            let url = self.endpoint(path)?;
            let mut request = self
                .http
                .request(method.clone(), url)
                .bearer_auth(self.bearer());
            if let Some(body) = body {
                request = request.json(body);
            }
            let response = request
                .send()
                .await
                .with_context(|| format!("Failed to reach {path}"))?;

            let status = response.status();
            let detail = if status.is_client_error() {
                read_detail(response).await
            } else {
                None
            };
            let outcome = Outcome::classify(status.as_u16(), detail);
            if !outcome.is_success() {
                tracing::warn!(path, code = outcome.code(), "mutation rejected");
            }
            Ok(outcome)
        })
        .await
    }
}
