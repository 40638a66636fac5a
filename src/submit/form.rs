//! Multipart ingestion.
//!
//! [`parse`] drains an inbound `multipart/form-data` body into a
//! [`SubmittedForm`]: text fields by name, and file parts fully buffered
//! in memory together with their declared filename and content type.
//! Nothing is forwarded until the whole body has been read.

use axum::body::Body;
use axum::http::{header, HeaderMap};
use bytes::Bytes;
use http_body_util::{LengthLimitError, Limited};

use crate::error::SubmitError;

pub const DEFAULT_FILENAME: &str = "upload.bin";
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub mime_type: Option<String>,
    pub content: Bytes,
}

impl UploadedFile {
    /// Declared filename, or [`DEFAULT_FILENAME`] when none (or an empty one) was sent.
    #[must_use]
    pub fn filename_or_default(&self) -> &str {
        self.filename
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_FILENAME)
    }

    /// Declared content type, or [`DEFAULT_MIME_TYPE`] when none was sent.
    #[must_use]
    pub fn mime_type_or_default(&self) -> &str {
        self.mime_type
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
    }
}

/// Fields and files of one submission, in first-seen order.
///
/// A repeated name replaces the earlier value but keeps its position.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubmittedForm {
    fields: Vec<(String, String)>,
    files: Vec<(String, UploadedFile)>,
}

impl SubmittedForm {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[cfg(test)]
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    pub fn insert_field(&mut self, name: String, value: String) {
        upsert(&mut self.fields, name, value);
    }

    pub fn insert_file(&mut self, name: String, file: UploadedFile) {
        upsert(&mut self.files, name, file);
    }

    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    #[must_use]
    pub fn files(&self) -> &[(String, UploadedFile)] {
        &self.files
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<(String, String)>, Vec<(String, UploadedFile)>) {
        (self.fields, self.files)
    }
}

fn upsert<T>(entries: &mut Vec<(String, T)>, name: String, value: T) {
    if let Some(slot) = entries.iter_mut().find(|(n, _)| *n == name) {
        slot.1 = value;
    } else {
        entries.push((name, value));
    }
}

/// Extract the multipart boundary from the request's `Content-Type`.
pub fn boundary(headers: &HeaderMap) -> Result<String, SubmitError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    Ok(multer::parse_boundary(content_type)?)
}

/// Reject a body whose declared `Content-Length` is already over `limit`.
pub fn check_declared_length(headers: &HeaderMap, limit: usize) -> Result<(), SubmitError> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    match declared {
        Some(len) if len > limit as u64 => Err(SubmitError::PayloadTooLarge { limit }),
        _ => Ok(()),
    }
}

/// Read every part of a multipart body of at most `limit` bytes.
///
/// Parts carrying a `filename` parameter (even an empty one) are files;
/// everything else is a text field. Parts without a name are skipped.
pub async fn parse(body: Body, boundary: String, limit: usize) -> Result<SubmittedForm, SubmitError> {
    let body = Body::new(Limited::new(body, limit));
    let mut multipart = multer::Multipart::new(body.into_data_stream(), boundary);
    let mut form = SubmittedForm::default();
    let classify = |e| classify_error(e, limit);

    while let Some(field) = multipart.next_field().await.map_err(classify)? {
        let Some(name) = field.name().map(str::to_string) else {
            tracing::debug!("skipping multipart part without a name");
            continue;
        };

        if let Some(filename) = field.file_name().map(str::to_string) {
            let mime_type = field.content_type().map(ToString::to_string);
            let content = field.bytes().await.map_err(classify)?;
            tracing::debug!(
                field = %name,
                filename = %filename,
                bytes = content.len(),
                "buffered file part"
            );
            form.insert_file(
                name,
                UploadedFile {
                    filename: Some(filename),
                    mime_type,
                    content,
                },
            );
        } else {
            let value = field.text().await.map_err(classify)?;
            form.insert_field(name, value);
        }
    }

    Ok(form)
}

/// A read failure caused by the size cap becomes `PayloadTooLarge`;
/// anything else stays a parse error.
fn classify_error(err: multer::Error, limit: usize) -> SubmitError {
    if let multer::Error::StreamReadFailed(ref source) = err {
        let first: &(dyn std::error::Error + 'static) = &**source;
        let mut cause = Some(first);
        while let Some(e) = cause {
            if e.is::<LengthLimitError>() {
                return SubmitError::PayloadTooLarge { limit };
            }
            cause = e.source();
        }
    }
    SubmitError::Parse(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "X-TEST-BOUNDARY";

    fn body(parts: &[&str]) -> Body {
        let mut raw = String::new();
        for part in parts {
            raw.push_str(&format!("--{BOUNDARY}\r\n{part}\r\n"));
        }
        raw.push_str(&format!("--{BOUNDARY}--\r\n"));
        Body::from(raw)
    }

    fn text_part(name: &str, value: &str) -> String {
        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
    }

    #[tokio::test]
    async fn parses_text_fields() {
        let form = parse(
            body(&[&text_part("_portalId", "123"), &text_part("foo", "bar")]),
            BOUNDARY.into(),
            usize::MAX,
        )
        .await
        .unwrap();

        assert_eq!(form.field("_portalId"), Some("123"));
        assert_eq!(form.field("foo"), Some("bar"));
        assert!(form.files().is_empty());
    }

    #[tokio::test]
    async fn last_duplicate_field_wins_in_first_position() {
        let form = parse(
            body(&[
                &text_part("a", "1"),
                &text_part("b", "2"),
                &text_part("a", "3"),
            ]),
            BOUNDARY.into(),
            usize::MAX,
        )
        .await
        .unwrap();

        assert_eq!(
            form.fields(),
            &[("a".to_string(), "3".to_string()), ("b".to_string(), "2".to_string())]
        );
    }

    #[tokio::test]
    async fn buffers_file_parts_with_metadata() {
        let file = "Content-Disposition: form-data; name=\"upload\"; filename=\"a.png\"\r\n\
                    Content-Type: image/png\r\n\r\nPNGDATA";
        let form = parse(body(&[file]), BOUNDARY.into(), usize::MAX).await.unwrap();

        let upload = form.file("upload").unwrap();
        assert_eq!(upload.filename.as_deref(), Some("a.png"));
        assert_eq!(upload.mime_type.as_deref(), Some("image/png"));
        assert_eq!(upload.content, Bytes::from_static(b"PNGDATA"));
        assert!(form.field("upload").is_none());
    }

    #[tokio::test]
    async fn empty_filename_still_marks_a_file() {
        let file = "Content-Disposition: form-data; name=\"doc\"; filename=\"\"\r\n\r\nraw";
        let form = parse(body(&[file]), BOUNDARY.into(), usize::MAX).await.unwrap();

        let doc = form.file("doc").unwrap();
        assert_eq!(doc.filename_or_default(), DEFAULT_FILENAME);
        assert_eq!(doc.mime_type_or_default(), DEFAULT_MIME_TYPE);
    }

    #[tokio::test]
    async fn truncated_stream_is_an_error() {
        let raw = format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nunterminated");
        let result = parse(Body::from(raw), BOUNDARY.into(), usize::MAX).await;
        assert!(matches!(result, Err(SubmitError::Parse(_))));
    }

    #[tokio::test]
    async fn body_over_the_limit_is_too_large() {
        let file = format!(
            "Content-Disposition: form-data; name=\"doc\"; filename=\"big.bin\"\r\n\r\n{}",
            "x".repeat(4096)
        );
        let result = parse(body(&[&file]), BOUNDARY.into(), 1024).await;
        assert!(matches!(
            result,
            Err(SubmitError::PayloadTooLarge { limit: 1024 })
        ));
    }

    #[test]
    fn declared_length_over_the_limit_is_rejected_up_front() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_LENGTH, "2048".parse().unwrap());
        assert!(matches!(
            check_declared_length(&headers, 1024),
            Err(SubmitError::PayloadTooLarge { limit: 1024 })
        ));
        assert!(check_declared_length(&headers, 4096).is_ok());
        assert!(check_declared_length(&HeaderMap::new(), 1024).is_ok());
    }

    #[test]
    fn boundary_from_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=abc123".parse().unwrap(),
        );
        assert_eq!(boundary(&headers).unwrap(), "abc123");
    }

    #[test]
    fn non_multipart_content_type_is_an_error() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert!(matches!(boundary(&headers), Err(SubmitError::Parse(_))));
        assert!(matches!(boundary(&HeaderMap::new()), Err(SubmitError::Parse(_))));
    }
}
