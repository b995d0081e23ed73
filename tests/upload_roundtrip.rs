//! End-to-end upload against an in-process stub that parses the multipart body
//! with axum's own multipart extractor.

use std::time::Duration;

use axum::extract::Multipart;
use axum::http::{header, HeaderMap};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use lightrag_bridge::config::ForwardingTarget;
use lightrag_bridge::forward::ForwardingClient;
use lightrag_bridge::hook::UploadHook;
use lightrag_bridge::multipart::{self, FileMetadata, FileSubmission};

/// Echo what a standard multipart parser sees in the `file` field
async fn echo_upload(headers: HeaderMap, mut form: Multipart) -> Json<Value> {
    let declared_length = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());

    while let Ok(Some(field)) = form.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap_or_default();

        return Json(json!({
            "track_id": "stub",
            "status": "success",
            "file_name": file_name,
            "content_type": content_type,
            "length": data.len(),
            "bytes": data.to_vec(),
            "declared_length": declared_length,
        }));
    }

    Json(json!({"status": "error", "length": null}))
}

/// Start the stub LightRAG proxy and return its base URL
async fn start_stub() -> String {
    let app = Router::new().route("/v1/files/upload", post(echo_upload));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client() -> ForwardingClient {
    ForwardingClient::new(Duration::from_secs(10)).expect("client")
}

#[tokio::test]
async fn ten_byte_text_file_reports_length_ten() {
    let target = ForwardingTarget::new(start_stub().await);
    let submission =
        FileSubmission::new(b"0123456789".to_vec(), FileMetadata::new("a.txt", "text/plain"))
            .unwrap();

    let reply = client()
        .forward_upload(&target, &submission)
        .await
        .expect("stub reply");

    assert_eq!(reply["length"], 10);
    assert_eq!(reply["file_name"], "a.txt");
    assert_eq!(reply["content_type"], "text/plain");
}

#[tokio::test]
async fn binary_payload_survives_standard_parser() {
    let target = ForwardingTarget::new(start_stub().await);
    let data: Vec<u8> = (0..=255u8).chain([b'\r', b'\n', b'-', b'-']).collect();
    let submission = FileSubmission::new(
        data.clone(),
        FileMetadata::new("scan.pdf", "application/pdf").with_submitter("user-9"),
    )
    .unwrap();
    let expected_length = multipart::encode(&submission).content_length;

    let reply = client()
        .forward_upload(&target, &submission)
        .await
        .expect("stub reply");

    let echoed: Vec<u8> = serde_json::from_value(reply["bytes"].clone()).unwrap();
    assert_eq!(echoed, data);
    assert_eq!(reply["file_name"], "scan.pdf");
    assert_eq!(reply["content_type"], "application/pdf");
    // Boundaries differ per call but always have the same length
    assert_eq!(reply["declared_length"], expected_length);
}

#[tokio::test]
async fn hook_path_variant_round_trips() {
    let target = ForwardingTarget::new(start_stub().await);
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("persisted.bin");
    tokio::fs::write(&path, b"persisted by the host").await.unwrap();

    let hook = UploadHook::new(client());
    let reply = hook
        .submit_path(&target, &path, FileMetadata::new("notes.txt", "text/plain"))
        .await
        .expect("stub reply");

    assert_eq!(reply["length"], "persisted by the host".len());
    assert_eq!(reply["file_name"], "notes.txt");
}
