//! Multipart body encoder

use uuid::Uuid;

use super::types::{EncodedBody, FileSubmission};

/// Fixed boundary prefix; a random suffix follows
pub const BOUNDARY_PREFIX: &str = "----formdata-lightrag-";

/// Form field the LightRAG proxy reads the file from
pub const FIELD_NAME: &str = "file";

const CRLF: &str = "\r\n";

/// Encode a submission as a single-field `multipart/form-data` body
pub fn encode(submission: &FileSubmission) -> EncodedBody {
    let boundary = format!("{}{}", BOUNDARY_PREFIX, Uuid::new_v4().simple());
    encode_with_boundary(submission, boundary)
}

fn encode_with_boundary(submission: &FileSubmission, boundary: String) -> EncodedBody {
    let header = format!(
        "--{boundary}{CRLF}\
         Content-Disposition: form-data; name=\"{FIELD_NAME}\"; filename=\"{filename}\"{CRLF}\
         Content-Type: {mime}{CRLF}\
         {CRLF}",
        filename = escape_filename(submission.file_name()),
        mime = submission.mime_type(),
    );
    let footer = format!("{CRLF}--{boundary}--{CRLF}");

    let file_bytes = submission.bytes();
    let mut body = Vec::with_capacity(header.len() + file_bytes.len() + footer.len());
    body.extend_from_slice(header.as_bytes());
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(footer.as_bytes());

    // Measured after concatenation so the declared length can never drift
    let content_length = body.len();

    EncodedBody {
        body,
        boundary,
        content_length,
    }
}

/// Percent-escape characters that would terminate the quoted `filename`
fn escape_filename(name: &str) -> String {
    name.replace('\\', "%5C").replace('"', "%22")
}
