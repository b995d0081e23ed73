//! Multipart Encoding
//!
//! Builds `multipart/form-data` request bodies for the LightRAG upload
//! endpoint by hand, one `file` field per body.
//!
//! Layout of an encoded body:
//! 1. `--{boundary}` line, `Content-Disposition` and `Content-Type` headers, blank line
//! 2. Raw file bytes, untouched
//! 3. `\r\n--{boundary}--\r\n`

mod encoder;
mod types;

pub use encoder::{encode, BOUNDARY_PREFIX, FIELD_NAME};
pub use types::{EncodedBody, FileMetadata, FileSubmission, SubmissionError, UNKNOWN_SUBMITTER};
