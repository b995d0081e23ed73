//! LightRAG proxy client

use std::time::Duration;

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde_json::{json, Value};

use super::types::{body_snippet, ForwardError, RemoteReply};
use crate::config::ForwardingTarget;
use crate::multipart::{self, FileSubmission};

/// Remote upload endpoint
pub const UPLOAD_PATH: &str = "/v1/files/upload";

/// Remote document collection endpoint
pub const DOCUMENTS_PATH: &str = "/v1/documents";

/// Remote OpenAI-style chat endpoint
pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Model identifier the proxy maps onto the knowledge base
pub const KNOWLEDGE_BASE_MODEL: &str = "lightrag:latest";

/// Client for the LightRAG proxy
#[derive(Clone)]
pub struct ForwardingClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl ForwardingClient {
    /// Create a client whose requests abort after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, ForwardError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForwardError::Request {
                url: String::new(),
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { http, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ========================================================================
    // Upload (never fails)
    // ========================================================================

    /// Send a file to LightRAG, resolving to the parsed reply or `None`
    ///
    /// `None` covers non-2xx statuses, transport errors, timeouts and bodies
    /// that are not JSON. Every outcome is logged; nothing is retried.
    pub async fn forward_upload(
        &self,
        target: &ForwardingTarget,
        submission: &FileSubmission,
    ) -> Option<Value> {
        tracing::info!(
            target_url = %target.base_url(),
            file_name = %submission.file_name(),
            size = submission.size(),
            mime_type = %submission.mime_type(),
            submitter_id = %submission.submitter_id(),
            "Starting file upload to LightRAG"
        );

        let (status, raw) = match self.send_multipart(target, submission).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(
                    target_url = %target.base_url(),
                    file_name = %submission.file_name(),
                    error_kind = e.kind(),
                    error = %e,
                    "Failed to send file to LightRAG"
                );
                return None;
            }
        };

        if !(200..300).contains(&status) {
            tracing::error!(
                target_url = %target.base_url(),
                file_name = %submission.file_name(),
                status,
                response = %body_snippet(&raw),
                "LightRAG upload rejected"
            );
            return None;
        }

        match serde_json::from_slice::<Value>(&raw) {
            Ok(reply) => {
                tracing::info!(
                    file_name = %submission.file_name(),
                    status,
                    track_id = ?reply.get("track_id"),
                    remote_status = ?reply.get("status"),
                    message = ?reply.get("message"),
                    "File sent to LightRAG successfully"
                );
                Some(reply)
            }
            Err(e) => {
                tracing::error!(
                    file_name = %submission.file_name(),
                    status,
                    error = %e,
                    raw = %body_snippet(&raw),
                    "Failed to parse LightRAG upload response"
                );
                None
            }
        }
    }

    // ========================================================================
    // Route-facing calls
    // ========================================================================

    /// Upload a file and return the proxy's reply, whatever its status
    pub async fn upload_file(
        &self,
        target: &ForwardingTarget,
        submission: &FileSubmission,
    ) -> Result<RemoteReply, ForwardError> {
        let (status, raw) = self.send_multipart(target, submission).await?;
        parse_reply(&target.url(UPLOAD_PATH), status, &raw)
    }

    /// GET /v1/documents
    pub async fn list_documents(
        &self,
        target: &ForwardingTarget,
    ) -> Result<RemoteReply, ForwardError> {
        let url = target.url(DOCUMENTS_PATH);
        tracing::debug!(url = %url, "Fetching documents from LightRAG");

        let request = self.http.get(&url).header(CONTENT_TYPE, "application/json");
        self.execute(&url, request).await
    }

    /// DELETE /v1/documents/{id}
    pub async fn delete_document(
        &self,
        target: &ForwardingTarget,
        document_id: &str,
    ) -> Result<RemoteReply, ForwardError> {
        let url = target.url(&format!(
            "{}/{}",
            DOCUMENTS_PATH,
            urlencoding::encode(document_id)
        ));
        tracing::debug!(url = %url, document_id = %document_id, "Deleting LightRAG document");

        let request = self
            .http
            .delete(&url)
            .header(CONTENT_TYPE, "application/json");
        self.execute(&url, request).await
    }

    /// POST /v1/chat/completions with the query as a single user message
    pub async fn chat_completion(
        &self,
        target: &ForwardingTarget,
        query: &str,
    ) -> Result<RemoteReply, ForwardError> {
        let url = target.url(CHAT_COMPLETIONS_PATH);
        tracing::debug!(url = %url, query_len = query.len(), "Querying LightRAG knowledge base");

        let request = self.http.post(&url).json(&json!({
            "model": KNOWLEDGE_BASE_MODEL,
            "messages": [
                {
                    "role": "user",
                    "content": query,
                }
            ],
        }));
        self.execute(&url, request).await
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Encode and POST a submission, returning the raw status and body
    async fn send_multipart(
        &self,
        target: &ForwardingTarget,
        submission: &FileSubmission,
    ) -> Result<(u16, Vec<u8>), ForwardError> {
        let url = target.url(UPLOAD_PATH);
        let encoded = multipart::encode(submission);

        tracing::debug!(
            url = %url,
            boundary = %encoded.boundary,
            content_length = encoded.content_length,
            timeout_secs = self.timeout.as_secs(),
            "Multipart request built"
        );

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, encoded.content_type())
            .header(CONTENT_LENGTH, encoded.content_length)
            .body(encoded.body)
            .send()
            .await
            .map_err(|e| ForwardError::from_reqwest(&url, e))?;

        let status = response.status().as_u16();
        tracing::debug!(url = %url, status, "LightRAG response received");

        let raw = response
            .bytes()
            .await
            .map_err(|e| ForwardError::from_reqwest(&url, e))?;

        Ok((status, raw.to_vec()))
    }

    async fn execute(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<RemoteReply, ForwardError> {
        let response = request
            .send()
            .await
            .map_err(|e| ForwardError::from_reqwest(url, e))?;

        let status = response.status().as_u16();
        let raw = response
            .bytes()
            .await
            .map_err(|e| ForwardError::from_reqwest(url, e))?;

        tracing::debug!(url = %url, status, body_len = raw.len(), "LightRAG response received");
        parse_reply(url, status, &raw)
    }
}

/// Success replies must be JSON; error replies may carry anything
fn parse_reply(url: &str, status: u16, raw: &[u8]) -> Result<RemoteReply, ForwardError> {
    match serde_json::from_slice::<Value>(raw) {
        Ok(body) => Ok(RemoteReply { status, body }),
        Err(_) if !(200..300).contains(&status) => {
            tracing::warn!(
                url = %url,
                status,
                raw = %body_snippet(raw),
                "LightRAG error reply is not JSON"
            );
            Ok(RemoteReply {
                status,
                body: Value::Null,
            })
        }
        Err(e) => Err(ForwardError::InvalidBody {
            url: url.to_string(),
            status,
            reason: e.to_string(),
        }),
    }
}
