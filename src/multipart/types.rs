//! Submission types for multipart encoding

/// Submitter recorded when the host does not identify the user
pub const UNKNOWN_SUBMITTER: &str = "unknown";

/// MIME type used when the host supplies none
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

// ============================================================================
// Metadata
// ============================================================================

/// Metadata the host supplies alongside a file
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Original file name
    pub file_name: String,

    /// MIME type of the file
    pub mime_type: String,

    /// Optional: User ID of the submitter
    pub submitter_id: Option<String>,
}

impl FileMetadata {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            submitter_id: None,
        }
    }

    pub fn with_submitter(mut self, submitter_id: impl Into<String>) -> Self {
        self.submitter_id = Some(submitter_id.into());
        self
    }
}

// ============================================================================
// Submission
// ============================================================================

/// A file on its way to LightRAG
///
/// Immutable once built. The size is always derived from the buffer itself.
#[derive(Debug, Clone)]
pub struct FileSubmission {
    bytes: Vec<u8>,
    file_name: String,
    mime_type: String,
    submitter_id: String,
}

impl FileSubmission {
    /// Build a submission, rejecting metadata that would break multipart headers
    pub fn new(bytes: Vec<u8>, metadata: FileMetadata) -> Result<Self, SubmissionError> {
        let FileMetadata {
            file_name,
            mime_type,
            submitter_id,
        } = metadata;

        if file_name.trim().is_empty() {
            return Err(SubmissionError::EmptyFileName);
        }
        if has_control_break(&file_name) {
            return Err(SubmissionError::UnsafeHeaderValue {
                field: "file name",
                value: file_name,
            });
        }
        if has_control_break(&mime_type) {
            return Err(SubmissionError::UnsafeHeaderValue {
                field: "MIME type",
                value: mime_type,
            });
        }

        let mime_type = if mime_type.trim().is_empty() {
            DEFAULT_MIME_TYPE.to_string()
        } else {
            mime_type.trim().to_string()
        };

        let submitter_id = submitter_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_SUBMITTER.to_string());

        Ok(Self {
            bytes,
            file_name,
            mime_type,
            submitter_id,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn submitter_id(&self) -> &str {
        &self.submitter_id
    }

    /// Size in bytes of the finalized buffer
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Take the buffer back, e.g. to hand it to the upload hook
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// CR, LF and NUL would let a value start a new header line
fn has_control_break(value: &str) -> bool {
    value.contains(['\r', '\n', '\0'])
}

/// Submission validation errors
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("File name is empty")]
    EmptyFileName,

    #[error("Unsafe {field} for multipart header: {value:?}")]
    UnsafeHeaderValue { field: &'static str, value: String },
}

// ============================================================================
// Encoded Body
// ============================================================================

/// A finished multipart body ready to send
#[derive(Debug, Clone)]
pub struct EncodedBody {
    /// Complete body: header segment, file bytes, footer segment
    pub body: Vec<u8>,

    /// Boundary token, without the leading dashes
    pub boundary: String,

    /// Exact byte length of `body`
    pub content_length: usize,
}

impl EncodedBody {
    /// Value for the `Content-Type` request header
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }
}
