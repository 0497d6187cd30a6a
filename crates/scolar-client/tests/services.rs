//! Integration tests for resource services: guard wiring, outcome
//! classification (spec scenarios C and D), and opaque QR bytes.

use std::sync::Arc;

use scolar_client::{ApiClient, Config, Outcome, SessionStore};
use scolar_types::{AttendanceStatus, Student};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_with_live_session(server: &MockServer) -> ApiClient {
    let config = Config {
        api_url: server.uri(),
        ..Config::default()
    };
    let session = SessionStore::new();
    session.set_pair("live-token", "refresh-token");
    ApiClient::new(&config, Arc::clone(&session)).unwrap()
}

/// Every service call runs the guard first: the access check fires once
/// per request.
async fn mount_valid_access(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/auth/check/token/access"))
        .and(body_json(serde_json::json!({ "token": "live-token" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "valid": true })),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn sample_student() -> Student {
    Student {
        id: 0,
        first_name: "Amina".to_string(),
        last_name: "Haddad".to_string(),
        email: "amina@example.org".to_string(),
        phone: "+33612345678".to_string(),
        birth_date: None,
        formation_ids: vec![],
    }
}

#[tokio::test]
async fn list_students_is_guarded_and_typed() {
    let server = MockServer::start().await;
    mount_valid_access(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/students"))
        .and(header("authorization", "Bearer live-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "id": 1,
                "first_name": "Amina",
                "last_name": "Haddad",
                "email": "amina@example.org",
                "phone": "+33612345678",
                "birth_date": null,
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_live_session(&server);
    let students = client.list_students().await.unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].display_name(), "Haddad, Amina");
}

/// Scenario D: 201 classifies as success; no error outcome is produced.
#[tokio::test]
async fn create_student_classifies_201_as_success() {
    let server = MockServer::start().await;
    mount_valid_access(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/students"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_live_session(&server);
    let outcome = client.create_student(&sample_student()).await.unwrap();
    assert_eq!(outcome, Outcome::Success { code: 201 });
}

/// Scenario C: 422 classifies as a validation error carrying the
/// server's field-specific detail and the numeric code.
#[tokio::test]
async fn create_student_surfaces_422_detail() {
    let server = MockServer::start().await;
    mount_valid_access(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/students"))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "detail": "phone: invalid format",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_live_session(&server);
    let outcome = client.create_student(&sample_student()).await.unwrap();
    assert_eq!(outcome.code(), 422);
    assert!(!outcome.is_success());
    assert_eq!(outcome.message(), "phone: invalid format");
}

#[tokio::test]
async fn delete_conflict_and_missing_record_classify_distinctly() {
    let server = MockServer::start().await;
    mount_valid_access(&server, 2).await;
    Mock::given(method("DELETE"))
        .and(path("/teachers/4"))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/teachers/5"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_live_session(&server);
    assert_eq!(
        client.delete_teacher(4).await.unwrap(),
        Outcome::Conflict { code: 409 }
    );
    assert_eq!(
        client.delete_teacher(5).await.unwrap(),
        Outcome::NotFound { code: 404 }
    );
}

#[tokio::test]
async fn attendance_scan_posts_code_and_succeeds() {
    let server = MockServer::start().await;
    mount_valid_access(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/attendance/scan"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_live_session(&server);
    let scan = scolar_client::services::attendance::ScanRequest::new("qr-payload", 3);
    let outcome = client.scan_checkin(&scan).await.unwrap();
    assert!(outcome.is_success());
}

#[tokio::test]
async fn record_attendance_serializes_status() {
    let server = MockServer::start().await;
    mount_valid_access(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/attendance"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_live_session(&server);
    let record = scolar_types::AttendanceRecord {
        id: 0,
        student_id: 1,
        formation_id: 2,
        date: chrono::NaiveDate::from_ymd_opt(2026, 2, 11).unwrap(),
        status: AttendanceStatus::Present,
        via_scan: false,
    };
    let outcome = client.record_attendance(&record).await.unwrap();
    assert!(outcome.is_success());

    // The wire body carries snake_case status.
    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests
        .iter()
        .find(|r| r.url.path() == "/attendance")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .unwrap();
    assert_eq!(body["status"], "present");
}

#[tokio::test]
async fn qr_bytes_are_forwarded_opaquely() {
    let server = MockServer::start().await;
    mount_valid_access(&server, 1).await;
    let png_bytes: &[u8] = b"\x89PNG\r\n\x1a\nfake-payload";
    Mock::given(method("GET"))
        .and(path("/students/7/qr"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(png_bytes),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_live_session(&server);
    let bytes = client.student_qr_png(7).await.unwrap();
    assert_eq!(bytes, png_bytes);
}

/// A doomed request after a failed guard still goes out and errors; the
/// disconnect side effect has already fired (fire-and-forget contract).
#[tokio::test]
async fn failed_guard_still_issues_doomed_request() {
    let server = MockServer::start().await;
    // No tokens stored: the guard disconnects without network calls, then
    // the service request goes out unauthenticated and is rejected.
    Mock::given(method("GET"))
        .and(path("/students"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        api_url: server.uri(),
        ..Config::default()
    };
    let session = SessionStore::new();
    let client = ApiClient::new(&config, Arc::clone(&session)).unwrap();

    let result = client.list_students().await;
    assert!(result.is_err());
    assert!(session.is_disconnected());
}
