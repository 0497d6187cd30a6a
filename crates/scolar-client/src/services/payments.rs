//! Payment endpoints.
//!
//! Amount computation happens server-side; the client only submits the
//! method/period and displays what comes back.

use anyhow::Result;
use reqwest::Method;
use scolar_types::Payment;

use crate::client::ApiClient;
use crate::outcome::Outcome;

impl ApiClient {
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn list_payments(&self) -> Result<Vec<Payment>> {
        self.guarded_list("payments").await
    }

    /// # Errors
    /// Returns an error only on transport failure.
    pub async fn record_payment(&self, payment: &Payment) -> Result<Outcome> {
        self.guarded_mutation(Method::POST, "payments", Some(payment))
            .await
    }

    /// # Errors
    /// Returns an error only on transport failure.
    pub async fn delete_payment(&self, id: u64) -> Result<Outcome> {
        self.guarded_mutation::<()>(Method::DELETE, &format!("payments/{id}"), None)
            .await
    }
}
