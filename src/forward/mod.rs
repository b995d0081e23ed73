//! LightRAG Forwarding
//!
//! HTTP client for the LightRAG proxy. Single attempt per call, bounded by the
//! configured timeout, no retries.
//!
//! Two styles of call:
//! - `forward_upload`: resolves to the parsed reply or `None`, never an error
//! - route-facing calls (`upload_file`, `list_documents`, ...): return a
//!   `RemoteReply` so callers can mirror the remote status code

mod client;
mod types;

pub use client::{ForwardingClient, CHAT_COMPLETIONS_PATH, DOCUMENTS_PATH, KNOWLEDGE_BASE_MODEL, UPLOAD_PATH};
pub use types::{ForwardError, RemoteReply};
