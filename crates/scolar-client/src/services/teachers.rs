//! Teacher endpoints.

use anyhow::Result;
use reqwest::Method;
use scolar_types::Teacher;

use crate::client::ApiClient;
use crate::outcome::Outcome;

impl ApiClient {
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn list_teachers(&self) -> Result<Vec<Teacher>> {
        self.guarded_list("teachers").await
    }

    /// # Errors
    /// Returns an error only on transport failure.
    pub async fn create_teacher(&self, teacher: &Teacher) -> Result<Outcome> {
        self.guarded_mutation(Method::POST, "teachers", Some(teacher))
            .await
    }

    /// # Errors
    /// Returns an error only on transport failure.
    pub async fn update_teacher(&self, teacher: &Teacher) -> Result<Outcome> {
        self.guarded_mutation(
            Method::PUT,
            &format!("teachers/{}", teacher.id),
            Some(teacher),
        )
        .await
    }

    /// # Errors
    /// Returns an error only on transport failure.
    pub async fn delete_teacher(&self, id: u64) -> Result<Outcome> {
        self.guarded_mutation::<()>(Method::DELETE, &format!("teachers/{id}"), None)
            .await
    }
}
