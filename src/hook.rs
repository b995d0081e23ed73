//! Upload Hook
//!
//! Mirrors host file-intake events to LightRAG. The host calls this whenever
//! a file enters the system, either as an in-memory buffer or as a file it has
//! already written to disk. Failures here are logged and swallowed so they can
//! never affect the host's own file handling.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::ForwardingTarget;
use crate::forward::ForwardingClient;
use crate::multipart::{FileMetadata, FileSubmission};

/// Where the hook reads file bytes from
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Bytes already in memory
    Buffer(Vec<u8>),
    /// A file the host has persisted
    Path(PathBuf),
}

/// Entry point for host file-intake events
#[derive(Clone)]
pub struct UploadHook {
    client: ForwardingClient,
}

impl UploadHook {
    pub fn new(client: ForwardingClient) -> Self {
        Self { client }
    }

    /// Forward an in-memory file
    pub async fn submit_buffer(
        &self,
        target: &ForwardingTarget,
        bytes: Vec<u8>,
        metadata: FileMetadata,
    ) -> Option<Value> {
        let file_name = metadata.file_name.clone();
        let submission = match FileSubmission::new(bytes, metadata) {
            Ok(submission) => submission,
            Err(e) => {
                tracing::warn!(file_name = %file_name, error = %e, "Skipping LightRAG upload");
                return None;
            }
        };

        self.client.forward_upload(target, &submission).await
    }

    /// Forward a file the host has already written to `path`
    ///
    /// A missing file resolves to `None` without any network call.
    pub async fn submit_path(
        &self,
        target: &ForwardingTarget,
        path: &Path,
        metadata: FileMetadata,
    ) -> Option<Value> {
        tracing::info!(
            path = %path.display(),
            file_name = %metadata.file_name,
            mime_type = %metadata.mime_type,
            "Starting file upload to LightRAG from path"
        );

        match tokio::fs::try_exists(path).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(path = %path.display(), "File not found, skipping LightRAG upload");
                return None;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot access file, skipping LightRAG upload");
                return None;
            }
        }

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to read file for LightRAG upload");
                return None;
            }
        };
        tracing::debug!(path = %path.display(), size = bytes.len(), "File read from disk");

        self.submit_buffer(target, bytes, metadata).await
    }

    /// Forward from either source
    pub async fn submit(
        &self,
        target: &ForwardingTarget,
        source: FileSource,
        metadata: FileMetadata,
    ) -> Option<Value> {
        match source {
            FileSource::Buffer(bytes) => self.submit_buffer(target, bytes, metadata).await,
            FileSource::Path(path) => self.submit_path(target, &path, metadata).await,
        }
    }

    /// Run the hook on a detached task
    ///
    /// The outcome is only logged. Nothing is returned, so the caller's
    /// response path cannot end up waiting on it.
    pub fn spawn_detached(&self, target: ForwardingTarget, source: FileSource, metadata: FileMetadata) {
        let hook = self.clone();
        let file_name = metadata.file_name.clone();

        tokio::spawn(async move {
            match hook.submit(&target, source, metadata).await {
                Some(reply) => tracing::info!(
                    file_name = %file_name,
                    track_id = ?reply.get("track_id"),
                    "Upload hook completed"
                ),
                None => tracing::warn!(file_name = %file_name, "Upload hook produced no result"),
            }
        });
    }
}
