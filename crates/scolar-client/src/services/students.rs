//! Student endpoints.

use anyhow::Result;
use reqwest::Method;
use scolar_types::Student;

use crate::client::ApiClient;
use crate::outcome::Outcome;

impl ApiClient {
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn list_students(&self) -> Result<Vec<Student>> {
        self.guarded_list("students").await
    }

    /// # Errors
    /// Returns an error only on transport failure; rejections come back
    /// as the outcome.
    pub async fn create_student(&self, student: &Student) -> Result<Outcome> {
        self.guarded_mutation(Method::POST, "students", Some(student))
            .await
    }

    /// # Errors
    /// Returns an error only on transport failure.
    pub async fn update_student(&self, student: &Student) -> Result<Outcome> {
        self.guarded_mutation(
            Method::PUT,
            &format!("students/{}", student.id),
            Some(student),
        )
        .await
    }

    /// # Errors
    /// Returns an error only on transport failure.
    pub async fn delete_student(&self, id: u64) -> Result<Outcome> {
        self.guarded_mutation::<()>(Method::DELETE, &format!("students/{id}"), None)
            .await
    }
}
