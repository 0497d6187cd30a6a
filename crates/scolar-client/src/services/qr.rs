//! Student QR badge export.
//!
//! The QR image is generated server-side; these bytes are forwarded
//! opaquely (written to disk or discarded), never decoded.

use anyhow::{Context, Result};

use crate::client::ApiClient;

impl ApiClient {
    /// Fetches the PNG bytes of a student's check-in QR badge.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn student_qr_png(&self, student_id: u64) -> Result<Vec<u8>> {
        self.guarded(|| async {
            let path = format!("students/{student_id}/qr");
            let url = self.endpoint(&path)?;
            let response = self
                .http
                .get(url)
                .bearer_auth(self.bearer())
                .send()
                .await
                .context("Failed to fetch QR badge")?;

            let status = response.status();
            if !status.is_success() {
                anyhow::bail!("QR badge request failed (HTTP {status})");
            }
            let bytes = response
                .bytes()
                .await
                .context("Failed to read QR badge bytes")?;
            Ok(bytes.to_vec())
        })
        .await
    }
}
