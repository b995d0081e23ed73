//! Forwarding types

use serde_json::Value;

/// Characters of an unparseable body kept for diagnostics
pub(crate) const BODY_SNIPPET_LEN: usize = 500;

/// A reply from the LightRAG proxy, whatever its status
#[derive(Debug, Clone)]
pub struct RemoteReply {
    /// HTTP status code returned by the proxy
    pub status: u16,

    /// Parsed JSON body (`Null` for an empty or non-JSON error body)
    pub body: Value,
}

impl RemoteReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The proxy's `message` field, if it sent one
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

/// Forwarding errors
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Could not connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("Invalid response body from {url} (status {status}): {reason}")]
    InvalidBody {
        url: String,
        status: u16,
        reason: String,
    },
}

impl ForwardError {
    /// Classify a reqwest failure
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if err.is_connect() {
            Self::Connect {
                url: url.to_string(),
                reason: err.to_string(),
            }
        } else {
            Self::Request {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }

    /// Short machine-readable kind for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Connect { .. } => "connect",
            Self::Request { .. } => "request",
            Self::InvalidBody { .. } => "invalid_body",
        }
    }
}

/// First `BODY_SNIPPET_LEN` characters of a raw body, lossily decoded
pub(crate) fn body_snippet(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .chars()
        .take(BODY_SNIPPET_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reply_success_range() {
        let ok = RemoteReply {
            status: 201,
            body: Value::Null,
        };
        let redirect = RemoteReply {
            status: 300,
            body: Value::Null,
        };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
    }

    #[test]
    fn test_reply_message() {
        let reply = RemoteReply {
            status: 422,
            body: json!({"message": "unsupported file type"}),
        };
        assert_eq!(reply.message(), Some("unsupported file type"));

        let bare = RemoteReply {
            status: 500,
            body: json!({"detail": "boom"}),
        };
        assert_eq!(bare.message(), None);
    }

    #[test]
    fn test_body_snippet_truncates() {
        let raw = "x".repeat(2000);
        assert_eq!(body_snippet(raw.as_bytes()).len(), BODY_SNIPPET_LEN);
        assert_eq!(body_snippet(b"short"), "short");
    }
}
