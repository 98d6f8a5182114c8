use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use common::ledger::H256;

use crate::content::{self, ContentError};
use crate::ServiceState;

/// Segmented content is immutable once minted, so clients and proxies
/// may cache it indefinitely.
const CACHE_CONTROL_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// `GET /content/:id` - serve a primary record's content by the hex
/// hash of its kind key.
///
/// Inline and reconstructed segmented content are served identically;
/// the segmented suffix never leaks into the response content type.
pub async fn handler(State(state): State<ServiceState>, Path(id): Path<String>) -> Response {
    let primary_id = match id.parse::<H256>() {
        Ok(hash) => hash,
        Err(e) => {
            tracing::debug!("rejecting malformed content id: {}", e);
            return bad_request_response("invalid content id");
        }
    };

    match content::serve(&primary_id, &state).await {
        Ok(content) => {
            // stored content types are caller-supplied; serve anything
            // that fails to parse as a generic byte stream
            let content_type = content
                .content_type
                .parse::<mime::Mime>()
                .unwrap_or(mime::APPLICATION_OCTET_STREAM);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type.as_ref()),
                    (header::CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
                ],
                content.bytes,
            )
                .into_response()
        }
        Err(e) if e.is_not_found() => {
            tracing::debug!(%primary_id, "content not found: {}", e);
            not_found_response("content not found")
        }
        Err(e) => {
            tracing::error!(%primary_id, "failed to serve content: {}", e);
            error_response("failed to serve content")
        }
    }
}

fn bad_request_response(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, format!("Bad request: {}", message)).into_response()
}

fn not_found_response(message: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("Not found: {}", message)).into_response()
}

fn error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Error: {}", message),
    )
        .into_response()
}
