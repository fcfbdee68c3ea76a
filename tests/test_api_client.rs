//! Integration tests for the backend API client, against a mock server.
//!
//! Tests cover:
//! - Fetching and deserializing application records
//! - 404 mapping to the not-found variant
//! - Error message extraction from failure bodies
//! - Creating applications and submitting steps
//! - Checkout session creation and payment verification

mod common;

use common::*;
use serde_json::json;
use visawiz::api::{ApiClient, ApiError};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_application_deserializes_record() -> anyhow::Result<()> {
    // 1. Mock a partially filled record
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/applications/{TEST_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": TEST_ID,
            "applicant_details": {
                "given_names": "Ada",
                "surname": "Lovelace",
                "date_of_birth": "1815-12-10",
                "nationality": "British",
                "email": "ada@example.org",
                "phone": "+44 1234",
            },
            "status": "incomplete",
        })))
        .mount(&server)
        .await;

    // 2. Fetch and check presence logic on the result
    let client = ApiClient::new(server.uri())?;
    let record = client.fetch_application(TEST_ID).await?;
    assert_eq!(record.id, TEST_ID);
    assert!(record.has_step(Step::ApplicantDetails));
    assert!(!record.has_step(Step::PassportDetails));
    assert!(!record.paid);

    Ok(())
}

#[tokio::test]
async fn test_missing_application_maps_to_not_found() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applications/nope"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri())?;
    let error = client
        .fetch_application("nope")
        .await
        .expect_err("404 must be an error");
    assert!(error.is_not_found());

    Ok(())
}

#[tokio::test]
async fn test_error_body_message_is_preserved() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/applications"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "message": "date_of_birth is in the future" })),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri())?;
    let error = client
        .create_application(&json!({}))
        .await
        .expect_err("422 must be an error");
    match error {
        ApiError::Status { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "date_of_birth is in the future");
        }
        other => panic!("expected a status error, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn test_create_application_returns_generated_id() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let payload = json!({
        "given_names": "Ada",
        "surname": "Lovelace",
        "date_of_birth": "1815-12-10",
        "nationality": "British",
        "email": "ada@example.org",
        "phone": "+44 1234",
    });
    Mock::given(method("POST"))
        .and(path("/applications"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "app-900",
            "applicant_details": payload,
            "status": "incomplete",
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri())?;
    let record = client.create_application(&payload).await?;
    assert_eq!(record.id, "app-900");

    Ok(())
}

#[tokio::test]
async fn test_submit_and_update_hit_the_step_endpoint() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let payload = json!({
        "passport_number": "X1234567",
        "issuing_country": "Netherlands",
        "issue_date": "2020-01-15",
        "expiry_date": "2030-01-14",
    });
    let body = json!({
        "id": TEST_ID,
        "passport_details": payload,
        "status": "incomplete",
    });
    Mock::given(method("POST"))
        .and(path(format!("/applications/{TEST_ID}/passport_details")))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(format!("/applications/{TEST_ID}/passport_details")))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri())?;
    let record = client
        .submit_step(TEST_ID, Step::PassportDetails, &payload)
        .await?;
    assert!(record.has_step(Step::PassportDetails));
    client
        .update_step(TEST_ID, Step::PassportDetails, &payload)
        .await?;

    Ok(())
}

#[tokio::test]
async fn test_upload_file_sends_multipart() -> anyhow::Result<()> {
    // 1. A real temp file to upload
    let dir = tempfile::TempDir::new()?;
    let file_path = dir.path().join("bank-statement.pdf");
    tokio::fs::write(&file_path, b"%PDF-1.4 test").await?;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/applications/{TEST_ID}/documents")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": TEST_ID,
            "documents": { "files": [{ "name": "bank-statement.pdf", "size": 13 }] },
            "status": "pending document",
        })))
        .expect(1)
        .mount(&server)
        .await;

    // 2. Upload and check the returned record counts the file
    let client = ApiClient::new(server.uri())?;
    let record = client
        .upload_file(TEST_ID, Step::Documents, &file_path)
        .await?;
    assert!(record.has_step(Step::Documents));

    Ok(())
}

#[tokio::test]
async fn test_upload_missing_file_fails_before_any_request() -> anyhow::Result<()> {
    let server = MockServer::start().await;

    let client = ApiClient::new(server.uri())?;
    let error = client
        .upload_file(TEST_ID, Step::Photo, std::path::Path::new("/no/such/photo.jpg"))
        .await
        .expect_err("missing file must fail");
    assert!(matches!(error, ApiError::File { .. }));

    Ok(())
}

#[tokio::test]
async fn test_checkout_session_and_verification() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payments/checkout-session"))
        .and(body_json(json!({ "application_id": TEST_ID })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "cs_42",
            "checkout_url": "https://pay.example.org/cs_42",
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/payments/verify/cs_42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "paid": true })))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri())?;
    let session = client.create_checkout_session(TEST_ID).await?;
    assert_eq!(session.session_id, "cs_42");
    assert_eq!(session.checkout_url, "https://pay.example.org/cs_42");

    let outcome = client.verify_session(&session.session_id).await?;
    assert!(outcome.paid);

    Ok(())
}
