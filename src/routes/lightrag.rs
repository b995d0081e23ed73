//! LightRAG plugin routes
//!
//! Endpoints:
//! - POST /upload - Forward a single multipart `file` part to LightRAG
//! - GET /documents - List knowledge-base documents
//! - DELETE /documents/:document_id - Remove a document
//! - POST /search - Ask a question against the knowledge base

use axum::{
    body::Bytes,
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, Path, State,
    },
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::context::UserContext;
use crate::envelope::ResponseEnvelope;
use crate::error::{AppError, Result};
use crate::hook::FileSource;
use crate::multipart::{FileMetadata, FileSubmission, FIELD_NAME};
use crate::state::AppState;

/// Room for multipart framing and small extra fields on top of the file cap
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the LightRAG router
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(upload).layer(DefaultBodyLimit::max(
                max_upload_bytes.saturating_add(MULTIPART_OVERHEAD),
            )),
        )
        .route("/documents", get(list_documents))
        .route("/documents/:document_id", delete(delete_document))
        .route("/search", post(search))
}

// ============================================================================
// Upload
// ============================================================================

/// POST /upload
///
/// Forwards the file to LightRAG, then mirrors it through the upload hook on a
/// detached task. The response never waits on the hook.
async fn upload(
    State(state): State<AppState>,
    user: UserContext,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ResponseEnvelope>> {
    let mut multipart = multipart.map_err(|e| {
        tracing::warn!(error = %e, "Upload is not a multipart request");
        AppError::BadRequest("No file provided".to_string())
    })?;

    let max = state.config().lightrag.max_upload_bytes;
    let (bytes, file_name, mime_type) = read_file_field(&mut multipart, max)
        .await?
        .ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    let mut metadata = FileMetadata::new(file_name, mime_type);
    metadata.submitter_id = user.user_id.clone();
    let submission = FileSubmission::new(bytes, metadata.clone())?;

    let target = user.target(&state.config().lightrag);
    tracing::info!(
        file_name = %submission.file_name(),
        size = submission.size(),
        target_url = %target.base_url(),
        "Uploading file to LightRAG"
    );

    let reply = state.client().upload_file(&target, &submission).await?;
    if !reply.is_success() {
        return Err(AppError::remote("Failed to upload file to LightRAG", reply));
    }

    tracing::info!(file_name = %submission.file_name(), "File uploaded to LightRAG");

    let message = format!(
        "File \"{}\" uploaded successfully to LightRAG",
        submission.file_name()
    );
    state.hook().spawn_detached(
        target,
        FileSource::Buffer(submission.into_bytes()),
        metadata,
    );

    Ok(Json(ResponseEnvelope::success(reply.body).with_message(message)))
}

/// Read the `file` part, enforcing the size cap while streaming
///
/// Returns `None` when the form has no `file` part. A `file` field without a
/// filename is a plain text field, not an upload, and is skipped.
async fn read_file_field(
    multipart: &mut Multipart,
    max: usize,
) -> Result<Option<(Vec<u8>, String, String)>> {
    while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(e, max))? {
        if field.name() != Some(FIELD_NAME) {
            continue;
        }

        let file_name = match field.file_name().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                tracing::warn!("Ignoring `file` field without a filename");
                continue;
            }
        };
        let mime_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| {
                mime_guess::from_path(&file_name)
                    .first_or_octet_stream()
                    .to_string()
            });
        let bytes = read_capped(field, max).await?;

        return Ok(Some((bytes, file_name, mime_type)));
    }

    Ok(None)
}

async fn read_capped(mut field: Field<'_>, max: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, max))? {
        if bytes.len() + chunk.len() > max {
            return Err(AppError::PayloadTooLarge { max });
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn multipart_error(err: MultipartError, max: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { max }
    } else {
        AppError::Internal(format!("Failed to read multipart body: {}", err))
    }
}

// ============================================================================
// Documents
// ============================================================================

/// GET /documents
async fn list_documents(
    State(state): State<AppState>,
    user: UserContext,
) -> Result<Json<ResponseEnvelope>> {
    let target = user.target(&state.config().lightrag);
    tracing::info!(target_url = %target.base_url(), "Fetching documents from LightRAG");

    let reply = state.client().list_documents(&target).await?;
    if !reply.is_success() {
        return Err(AppError::remote(
            "Failed to fetch documents from LightRAG",
            reply,
        ));
    }

    let documents = reply
        .body
        .get("documents")
        .filter(|docs| docs.is_array())
        .cloned()
        .unwrap_or_else(|| json!([]));

    Ok(Json(
        ResponseEnvelope::success(reply.body).with_documents(documents),
    ))
}

/// DELETE /documents/:document_id
async fn delete_document(
    State(state): State<AppState>,
    user: UserContext,
    Path(document_id): Path<String>,
) -> Result<Json<ResponseEnvelope>> {
    let target = user.target(&state.config().lightrag);
    tracing::info!(document_id = %document_id, "Deleting LightRAG document");

    let reply = state.client().delete_document(&target, &document_id).await?;
    if !reply.is_success() {
        return Err(AppError::remote(
            "Failed to delete document from LightRAG",
            reply,
        ));
    }

    tracing::info!(document_id = %document_id, "Document deleted");
    Ok(Json(
        ResponseEnvelope::success(reply.body).with_message("Document deleted successfully"),
    ))
}

// ============================================================================
// Search
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct SearchRequest {
    /// Kept loose so a non-string query is a 400, not a parse failure
    #[serde(default)]
    query: Option<Value>,
}

/// POST /search
///
/// An empty body or a query that is missing, blank or not a string is a 400
/// and never reaches LightRAG. A body that is not JSON is a 500.
async fn search(
    State(state): State<AppState>,
    user: UserContext,
    body: Bytes,
) -> Result<Json<ResponseEnvelope>> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        SearchRequest::default()
    } else {
        serde_json::from_slice::<SearchRequest>(&body)
            .map_err(|e| AppError::Internal(format!("Malformed search body: {}", e)))?
    };

    let query = request
        .query
        .as_ref()
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Search query is required".to_string()))?;

    let target = user.target(&state.config().lightrag);
    tracing::info!(target_url = %target.base_url(), query = %query, "Searching LightRAG");

    let reply = state.client().chat_completion(&target, &query).await?;
    if !reply.is_success() {
        return Err(AppError::remote("Search failed", reply));
    }

    let answer = extract_answer(&reply.body);
    Ok(Json(ResponseEnvelope::success(reply.body).with_answer(answer)))
}

/// First choice's message content, or a placeholder
fn extract_answer(body: &Value) -> String {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .filter(|content| !content.is_empty())
        .unwrap_or("No answer found")
        .to_string()
}
