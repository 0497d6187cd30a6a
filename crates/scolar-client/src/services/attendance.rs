//! Attendance endpoints, including QR check-in.

use anyhow::Result;
use reqwest::Method;
use scolar_types::AttendanceRecord;
use serde::Serialize;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::outcome::Outcome;

/// Check-in request built from a scanned QR payload.
///
/// `request_id` is client-generated so a double-fired scan can be
/// deduplicated server-side (the scanner hardware sometimes repeats).
#[derive(Debug, Clone, Serialize)]
pub struct ScanRequest {
    pub code: String,
    pub formation_id: u64,
    pub request_id: Uuid,
}

impl ScanRequest {
    pub fn new(code: impl Into<String>, formation_id: u64) -> Self {
        Self {
            code: code.into(),
            formation_id,
            request_id: Uuid::new_v4(),
        }
    }
}

impl ApiClient {
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn list_attendance(&self) -> Result<Vec<AttendanceRecord>> {
        self.guarded_list("attendance").await
    }

    /// # Errors
    /// Returns an error only on transport failure.
    pub async fn record_attendance(&self, record: &AttendanceRecord) -> Result<Outcome> {
        self.guarded_mutation(Method::POST, "attendance", Some(record))
            .await
    }

    /// # Errors
    /// Returns an error only on transport failure.
    pub async fn delete_attendance(&self, id: u64) -> Result<Outcome> {
        self.guarded_mutation::<()>(Method::DELETE, &format!("attendance/{id}"), None)
            .await
    }

    /// Registers a QR check-in scan.
    ///
    /// # Errors
    /// Returns an error only on transport failure.
    pub async fn scan_checkin(&self, scan: &ScanRequest) -> Result<Outcome> {
        self.guarded_mutation(Method::POST, "attendance/scan", Some(scan))
            .await
    }
}
