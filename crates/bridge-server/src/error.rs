use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bridge_core::BridgeError;

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
///
/// Every failure of a pass is reported as a 500 carrying only the top-level
/// message; the detail goes to the log.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.0.downcast_ref::<BridgeError>() {
            Some(e) if e.is_configuration() => {
                tracing::error!(error = %e, "trigger rejected: configuration incomplete")
            }
            _ => tracing::error!(error = ?self.0, "ticket processing failed"),
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
