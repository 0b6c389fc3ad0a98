//! HTTP-level integration tests for the `/api/pdf` endpoints.
//!
//! Requests go straight to the router via tower's `ServiceExt::oneshot`.
//! The in-memory store and a temporary storage root stand in for PostgreSQL
//! and the public disk.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete, get, pdf_bytes, post_json, post_multipart, post_raw_json,
    Part, BASE_URL,
};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn report_body(title: &str) -> Value {
    json!({
        "title": title,
        "institution_name": "Acme U",
        "address": "123 Main St",
        "content": "Quarterly numbers\nLooking good."
    })
}

/// `report_YYYYMMDD_HHMMSS_XXXXXX.pdf` / `upload_...`.
fn assert_generated_name(name: &str, prefix: &str) {
    let rest = name
        .strip_prefix(prefix)
        .and_then(|r| r.strip_prefix('_'))
        .and_then(|r| r.strip_suffix(".pdf"))
        .unwrap_or_else(|| panic!("unexpected filename {name}"));
    let parts: Vec<&str> = rest.split('_').collect();
    assert_eq!(parts.len(), 3, "{name}");
    assert!(parts[0].len() == 8 && parts[0].chars().all(|c| c.is_ascii_digit()));
    assert!(parts[1].len() == 6 && parts[1].chars().all(|c| c.is_ascii_digit()));
    assert!(parts[2].len() == 6 && parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
}

async fn upload_ok(app: &common::TestApp, name: &str) -> Value {
    let response = post_multipart(
        app.app(),
        "/api/pdf/upload",
        &[Part::file(name, "application/pdf", pdf_bytes(2048))],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn assert_error(response: axum::response::Response, status: StatusCode, code: &str) -> Value {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["status_code"], status.as_u16());
    assert_eq!(json["error_code"], code);
    json
}

// ---------------------------------------------------------------------------
// Generate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_creates_report() {
    let app = build_test_app();
    let response = post_json(app.app(), "/api/pdf/generate", report_body("Monthly Report")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["status_code"], 201);
    assert_eq!(json["message"], "PDF generated successfully");
    assert!(json.get("pagination").is_none());

    let data = &json["data"];
    assert_eq!(data["status"], "CREATED");
    let filename = data["filename"].as_str().unwrap();
    assert_generated_name(filename, "report");
    assert_eq!(
        data["filepath"],
        format!("{BASE_URL}/storage/uploads/pdf/{filename}")
    );

    let id = data["id"].as_i64().unwrap();
    let list = body_json(get(app.app(), "/api/pdf/list").await).await;
    let item = &list["data"][0];
    assert_eq!(item["id"], id);
    assert_eq!(item["original_name"], "Monthly Report.pdf");

    let stored = std::fs::read(app.storage.path().join("uploads/pdf").join(filename)).unwrap();
    assert!(stored.starts_with(b"%PDF-1.4"));
    assert_eq!(item["size"], stored.len() as i64);
}

#[tokio::test]
async fn generate_accepts_longest_title() {
    let app = build_test_app();
    let title = "t".repeat(255);
    let response = post_json(app.app(), "/api/pdf/generate", report_body(&title)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let list = body_json(get(app.app(), "/api/pdf/list").await).await;
    assert_eq!(list["data"][0]["original_name"], format!("{title}.pdf"));
}

#[tokio::test]
async fn generated_file_is_served_from_storage() {
    let app = build_test_app();
    let response = post_json(app.app(), "/api/pdf/generate", report_body("Served")).await;
    let json = body_json(response).await;
    let filename = json["data"]["filename"].as_str().unwrap();

    let response = get(app.app(), &format!("/storage/uploads/pdf/{filename}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn generate_with_svg_logo_uses_placeholder() {
    let app = build_test_app();
    let mut body = report_body("With Logo");
    body["logo_url"] = json!("https://example.com/brand/logo.svg");
    body["phone"] = json!("555-0100");

    let response = post_json(app.app(), "/api/pdf/generate", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn generate_missing_fields_is_validation_error() {
    let app = build_test_app();
    let response = post_json(
        app.app(),
        "/api/pdf/generate",
        json!({ "title": "Only a title" }),
    )
    .await;

    let json = assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    let message = json["message"].as_str().unwrap();
    assert!(message.contains("address, content, institution_name"), "{message}");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn generate_invalid_logo_url_is_validation_error() {
    let app = build_test_app();
    let mut body = report_body("Bad Logo");
    body["logo_url"] = json!("not-a-url");

    let response = post_json(app.app(), "/api/pdf/generate", body).await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[tokio::test]
async fn generate_malformed_json_is_validation_error() {
    let app = build_test_app();
    let response = post_raw_json(app.app(), "/api/pdf/generate", "{not json".into()).await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_stores_file() {
    let app = build_test_app();
    let json = upload_ok(&app, "Quarterly Results (final).pdf").await;
    assert_eq!(json["message"], "PDF uploaded successfully");

    let data = &json["data"];
    assert_eq!(data["status"], "UPLOADED");
    assert_eq!(data["original_name"], "Quarterly Results (final).pdf");
    assert_eq!(data["size"], 2048);
    let filename = data["filename"].as_str().unwrap();
    assert_generated_name(filename, "upload");
    assert!(app.storage.path().join("uploads/pdf").join(filename).is_file());
}

#[tokio::test]
async fn upload_keeps_long_client_name() {
    let app = build_test_app();
    let name = format!("{}.pdf", "n".repeat(300));
    let json = upload_ok(&app, &name).await;
    assert_eq!(json["data"]["original_name"], name);
}

#[tokio::test]
async fn upload_uppercase_extension_is_rejected() {
    let app = build_test_app();
    let response = post_multipart(
        app.app(),
        "/api/pdf/upload",
        &[Part::file("REPORT.PDF", "application/pdf", pdf_bytes(100))],
    )
    .await;

    let json = assert_error(response, StatusCode::UNPROCESSABLE_ENTITY, "INVALID_EXTENSION").await;
    assert_eq!(json["message"], "Only PDF files are allowed");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn upload_wrong_mime_is_rejected() {
    let app = build_test_app();
    let response = post_multipart(
        app.app(),
        "/api/pdf/upload",
        &[Part::file("notes.pdf", "text/plain", pdf_bytes(100))],
    )
    .await;

    let json = assert_error(response, StatusCode::UNPROCESSABLE_ENTITY, "INVALID_MIME_TYPE").await;
    assert_eq!(json["message"], "Invalid file type. Must be application/pdf");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn upload_over_ten_megabytes_is_rejected() {
    let app = build_test_app();
    let response = post_multipart(
        app.app(),
        "/api/pdf/upload",
        &[Part::file("big.pdf", "application/pdf", pdf_bytes(15 * 1024 * 1024))],
    )
    .await;

    let json = assert_error(response, StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE").await;
    assert_eq!(json["message"], "File size exceeds maximum limit (10MB)");
    assert!(app.store.is_empty().await);
    assert!(!app.storage.path().join("uploads/pdf").exists());
}

#[tokio::test]
async fn upload_over_body_limit_is_file_too_large() {
    let app = build_test_app();
    let response = post_multipart(
        app.app(),
        "/api/pdf/upload",
        &[Part::file("huge.pdf", "application/pdf", pdf_bytes(40 * 1024 * 1024))],
    )
    .await;

    let json = assert_error(response, StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE").await;
    assert_eq!(json["message"], "File size exceeds maximum limit (10MB)");
    assert!(app.store.is_empty().await);
    assert!(!app.storage.path().join("uploads/pdf").exists());
}

#[tokio::test]
async fn upload_exactly_ten_megabytes_is_accepted() {
    let app = build_test_app();
    let response = post_multipart(
        app.app(),
        "/api/pdf/upload",
        &[Part::file("edge.pdf", "application/pdf", pdf_bytes(10 * 1024 * 1024))],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn upload_without_file_part_is_no_file() {
    let app = build_test_app();
    let response = post_multipart(
        app.app(),
        "/api/pdf/upload",
        &[Part {
            name: "note",
            filename: None,
            content_type: None,
            data: b"hello".to_vec(),
        }],
    )
    .await;

    let json = assert_error(response, StatusCode::BAD_REQUEST, "NO_FILE").await;
    assert_eq!(json["message"], "No file uploaded");
}

#[tokio::test]
async fn upload_non_multipart_request_is_no_file() {
    let app = build_test_app();
    let response = post_json(app.app(), "/api/pdf/upload", json!({ "file": "x" })).await;
    assert_error(response, StatusCode::BAD_REQUEST, "NO_FILE").await;
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_filters_by_status() {
    let app = build_test_app();
    for i in 0..2 {
        post_json(app.app(), "/api/pdf/generate", report_body(&format!("R{i}"))).await;
    }
    for i in 0..3 {
        upload_ok(&app, &format!("u{i}.pdf")).await;
    }

    let response = get(app.app(), "/api/pdf/list?status=UPLOADED&limit=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "PDF list retrieved successfully");

    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i["status"] == "UPLOADED"));

    let pagination = &json["pagination"];
    assert_eq!(pagination["total"], 3);
    assert_eq!(pagination["total_pages"], 2);
    assert_eq!(
        pagination["next_url"],
        format!("{BASE_URL}/api/pdf/list?status=UPLOADED&page=2&limit=2")
    );
    assert_eq!(pagination["previous_url"], Value::Null);
}

#[tokio::test]
async fn list_second_page_holds_oldest_rows() {
    let app = build_test_app();
    let mut ids = Vec::new();
    for i in 0..15 {
        let json = upload_ok(&app, &format!("doc{i}.pdf")).await;
        ids.push(json["data"]["id"].as_i64().unwrap());
    }

    let json = body_json(get(app.app(), "/api/pdf/list?page=2&limit=10").await).await;
    let got: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_i64().unwrap())
        .collect();
    let expected: Vec<i64> = ids[..5].iter().rev().copied().collect();
    assert_eq!(got, expected);

    let pagination = &json["pagination"];
    assert_eq!(pagination["page"], 2);
    assert_eq!(pagination["total"], 15);
    assert_eq!(pagination["next_url"], Value::Null);
    assert_eq!(
        pagination["previous_url"],
        format!("{BASE_URL}/api/pdf/list?page=1&limit=10")
    );
}

#[tokio::test]
async fn list_includes_soft_deleted_rows() {
    let app = build_test_app();
    let json = upload_ok(&app, "gone.pdf").await;
    let id = json["data"]["id"].as_i64().unwrap();
    delete(app.app(), &format!("/api/pdf/{id}")).await;

    let json = body_json(get(app.app(), "/api/pdf/list?status=DELETED").await).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], id);
    assert!(items[0]["deleted_at"].is_string());
}

#[tokio::test]
async fn list_defaults_on_empty_store() {
    let app = build_test_app();
    let json = body_json(get(app.app(), "/api/pdf/list").await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
    assert_eq!(json["pagination"]["page"], 1);
    assert_eq!(json["pagination"]["limit"], 10);
    assert_eq!(json["pagination"]["total"], 0);
}

#[tokio::test]
async fn list_rejects_invalid_params() {
    let app = build_test_app();
    for uri in [
        "/api/pdf/list?status=ARCHIVED",
        "/api/pdf/list?page=0",
        "/api/pdf/list?page=abc",
        "/api/pdf/list?limit=101",
        "/api/pdf/list?limit=0",
    ] {
        let response = get(app.app(), uri).await;
        assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_twice_then_again_conflicts() {
    let app = build_test_app();
    let json = upload_ok(&app, "twice.pdf").await;
    let id = json["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/pdf/{id}");

    let response = delete(app.app(), &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "PDF deleted successfully");
    assert_eq!(json["data"]["id"], id);
    assert_eq!(json["data"]["status"], "DELETED");
    assert!(json["data"]["deleted_at"].is_string());

    for _ in 0..2 {
        let response = delete(app.app(), &uri).await;
        let json = assert_error(response, StatusCode::CONFLICT, "ALREADY_DELETED").await;
        assert_eq!(json["message"], "PDF file is already deleted");
    }
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let app = build_test_app();
    let response = delete(app.app(), "/api/pdf/999").await;

    let json = assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
    assert!(json["message"].as_str().unwrap().contains("not found"));
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn delete_non_numeric_id_is_bad_request() {
    let app = build_test_app();
    let response = delete(app.app(), "/api/pdf/abc").await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}
