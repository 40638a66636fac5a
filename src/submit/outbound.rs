//! Outbound multipart body construction.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};

use super::control::is_control_field;
use super::form::{SubmittedForm, UploadedFile, DEFAULT_MIME_TYPE};
use crate::error::SubmitError;

/// Re-encode a parsed submission for the upstream API.
///
/// Control fields are dropped; every other field is sent as a text part,
/// followed by every file with its filename and content type (or the
/// defaults when they were not declared).
pub fn build_form(form: SubmittedForm) -> Result<Form, SubmitError> {
    let (fields, files) = form.into_parts();

    let mut out = fields
        .into_iter()
        .filter(|(name, _)| !is_control_field(name))
        .fold(Form::new(), |out, (name, value)| out.text(name, value));

    for (name, file) in files {
        out = out.part(name, file_part(file)?);
    }

    Ok(out)
}

fn file_part(file: UploadedFile) -> Result<Part, SubmitError> {
    let filename = file.filename_or_default().to_string();
    let mime_type = file.mime_type_or_default().to_string();
    let len = file.content.len() as u64;

    // Cloning `Bytes` shares the buffer; the upload is not copied.
    let part = |content: Bytes| Part::stream_with_length(content, len).file_name(filename.clone());

    match part(file.content.clone()).mime_str(&mime_type) {
        Ok(part) => Ok(part),
        Err(e) => {
            tracing::warn!(
                mime_type = %mime_type,
                error = %e,
                "unparsable declared content type, falling back to {DEFAULT_MIME_TYPE}"
            );
            Ok(part(file.content).mime_str(DEFAULT_MIME_TYPE)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_part_accepts_declared_and_default_types() {
        for mime_type in [Some("image/png".to_string()), None, Some("not a mime".to_string())] {
            let file = UploadedFile {
                filename: Some("a.png".into()),
                mime_type,
                content: Bytes::from_static(b"\x89PNG"),
            };
            assert!(file_part(file).is_ok());
        }
    }
}
