//! Formation (training session) endpoints.

use anyhow::Result;
use reqwest::Method;
use scolar_types::Formation;

use crate::client::ApiClient;
use crate::outcome::Outcome;

impl ApiClient {
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn list_formations(&self) -> Result<Vec<Formation>> {
        self.guarded_list("formations").await
    }

    /// # Errors
    /// Returns an error only on transport failure.
    pub async fn create_formation(&self, formation: &Formation) -> Result<Outcome> {
        self.guarded_mutation(Method::POST, "formations", Some(formation))
            .await
    }

    /// # Errors
    /// Returns an error only on transport failure.
    pub async fn update_formation(&self, formation: &Formation) -> Result<Outcome> {
        self.guarded_mutation(
            Method::PUT,
            &format!("formations/{}", formation.id),
            Some(formation),
        )
        .await
    }

    /// # Errors
    /// Returns an error only on transport failure.
    pub async fn delete_formation(&self, id: u64) -> Result<Outcome> {
        self.guarded_mutation::<()>(Method::DELETE, &format!("formations/{id}"), None)
            .await
    }
}
