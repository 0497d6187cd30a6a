//! API resource types.
//!
//! Field shapes mirror the remote API's JSON payloads. The server is the
//! authority on validation and uniqueness; these types only carry data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A student enrolled at the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default)]
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    /// Formations this student is enrolled in.
    #[serde(default)]
    pub formation_ids: Vec<u64>,
}

impl Student {
    /// Full display name, "Last, First".
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

/// A teacher assigned to formations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    #[serde(default)]
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// Subject or speciality taught.
    pub speciality: String,
}

impl Teacher {
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

/// A formation (training session) with a schedule and a price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    #[serde(default)]
    pub id: u64,
    pub title: String,
    pub teacher_id: Option<u64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Monthly price in cents. The server computes amounts due.
    pub monthly_price_cents: i64,
    #[serde(default)]
    pub capacity: Option<u32>,
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
    Cheque,
}

/// A payment recorded against a student's enrollment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default)]
    pub id: u64,
    pub student_id: u64,
    pub formation_id: u64,
    /// Amount in cents, as computed by the server.
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub paid_on: NaiveDate,
    /// Month covered, "YYYY-MM".
    pub period: String,
}

/// Presence status for one student on one session day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    pub fn label(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Excused => "excused",
        }
    }
}

/// One attendance entry, recorded manually or via QR check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(default)]
    pub id: u64,
    pub student_id: u64,
    pub formation_id: u64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    /// True when the entry came from a QR scan rather than manual entry.
    #[serde(default)]
    pub via_scan: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_json_roundtrip() {
        let json = serde_json::json!({
            "id": 7,
            "first_name": "Amina",
            "last_name": "Haddad",
            "email": "amina@example.org",
            "phone": "+33612345678",
            "birth_date": "2004-09-17",
            "formation_ids": [1, 3],
        });
        let student: Student = serde_json::from_value(json).unwrap();
        assert_eq!(student.id, 7);
        assert_eq!(student.display_name(), "Haddad, Amina");
        assert_eq!(student.formation_ids, vec![1, 3]);
    }

    #[test]
    fn test_student_defaults_for_missing_fields() {
        // Create payloads omit id and enrollments.
        let json = serde_json::json!({
            "first_name": "Noor",
            "last_name": "Saleh",
            "email": "noor@example.org",
            "phone": "0612345678",
            "birth_date": null,
        });
        let student: Student = serde_json::from_value(json).unwrap();
        assert_eq!(student.id, 0);
        assert!(student.formation_ids.is_empty());
        assert!(student.birth_date.is_none());
    }

    #[test]
    fn test_attendance_status_serialization() {
        assert_eq!(
            serde_json::to_value(AttendanceStatus::Late).unwrap(),
            serde_json::json!("late")
        );
        let status: AttendanceStatus = serde_json::from_value(serde_json::json!("excused")).unwrap();
        assert_eq!(status, AttendanceStatus::Excused);
    }

    #[test]
    fn test_payment_method_snake_case() {
        let method: PaymentMethod = serde_json::from_value(serde_json::json!("transfer")).unwrap();
        assert_eq!(method, PaymentMethod::Transfer);
    }
}
