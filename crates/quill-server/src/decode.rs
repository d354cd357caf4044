//! Typed decoding of the dual-mode save request.
//!
//! The save endpoint accepts either a JSON body or a multipart form. Both
//! shapes are decoded here, once, into a single [`SaveSubmission`] value;
//! handlers never branch on the content type themselves.

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use quill_gateways::Attachment;
use serde::Deserialize;

use crate::error::ApiError;

/// Upper bound for a decoded JSON body; multipart uploads are bounded by
/// the router's body limit.
const MAX_JSON_BODY: usize = 2 * 1024 * 1024;

/// One fully-decoded save request: the document, its target file name,
/// and an optional image attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSubmission {
    pub content: String,
    pub file_name: String,
    pub image: Option<Attachment>,
}

#[derive(Debug, Deserialize)]
struct JsonSave {
    content: String,
    #[serde(rename = "fileName")]
    file_name: String,
}

/// Decode a save request from either supported shape.
pub async fn decode_save_request(request: Request) -> Result<SaveSubmission, ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        decode_multipart(request).await
    } else {
        decode_json(request).await
    }
}

async fn decode_json(request: Request) -> Result<SaveSubmission, ApiError> {
    let bytes = axum::body::to_bytes(request.into_body(), MAX_JSON_BODY)
        .await
        .map_err(|err| ApiError::validation(format!("Could not read request body: {err}")))?;

    let body: JsonSave = serde_json::from_slice(&bytes)
        .map_err(|err| ApiError::validation(format!("Invalid JSON body: {err}")))?;

    Ok(SaveSubmission {
        content: body.content,
        file_name: body.file_name,
        image: None,
    })
}

async fn decode_multipart(request: Request) -> Result<SaveSubmission, ApiError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|err| ApiError::validation(format!("Invalid multipart body: {err}")))?;

    let mut content = None;
    let mut file_name = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::validation(format!("Invalid multipart field: {err}")))?
    {
        match field.name() {
            Some("content") => {
                content = Some(field.text().await.map_err(|err| {
                    ApiError::validation(format!("Unreadable content field: {err}"))
                })?);
            }
            Some("fileName") => {
                file_name = Some(field.text().await.map_err(|err| {
                    ApiError::validation(format!("Unreadable fileName field: {err}"))
                })?);
            }
            Some("image") => {
                let name = field.file_name().unwrap_or("image").to_string();
                let bytes = field.bytes().await.map_err(|err| {
                    ApiError::validation(format!("Unreadable image field: {err}"))
                })?;
                image = Some(Attachment {
                    name,
                    bytes: bytes.to_vec(),
                });
            }
            // Unknown fields are ignored rather than rejected.
            _ => {}
        }
    }

    Ok(SaveSubmission {
        content: content.ok_or_else(|| ApiError::validation("Missing content field"))?,
        file_name: file_name.ok_or_else(|| ApiError::validation("Missing fileName field"))?,
        image,
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;

    use super::*;

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn decodes_a_json_save() {
        let request = json_request(r##"{"content": "# Hi", "fileName": "hello"}"##);

        let submission = decode_save_request(request).await.unwrap();

        assert_eq!(submission.content, "# Hi");
        assert_eq!(submission.file_name, "hello");
        assert_eq!(submission.image, None);
    }

    #[tokio::test]
    async fn rejects_malformed_json() {
        let request = json_request("{not json");

        let err = decode_save_request(request).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn decodes_a_multipart_save_with_image() {
        let boundary = "XQUILLBOUNDARYX";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"fileName\"\r\n\r\n\
             hello\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"content\"\r\n\r\n\
             # Hi\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"image\"; filename=\"cover.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             PNGDATA\r\n\
             --{boundary}--\r\n"
        );

        let request = Request::builder()
            .method("POST")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let submission = decode_save_request(request).await.unwrap();

        assert_eq!(submission.content, "# Hi");
        assert_eq!(submission.file_name, "hello");
        let image = submission.image.unwrap();
        assert_eq!(image.name, "cover.png");
        assert_eq!(image.bytes, b"PNGDATA");
    }

    #[tokio::test]
    async fn multipart_without_content_is_a_validation_error() {
        let boundary = "XQUILLBOUNDARYX";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"fileName\"\r\n\r\n\
             hello\r\n\
             --{boundary}--\r\n"
        );

        let request = Request::builder()
            .method("POST")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let err = decode_save_request(request).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Missing content field");
    }
}
