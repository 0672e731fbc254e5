//! Translation from domain errors to HTTP responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::DomainError;
use thiserror::Error;
use tracing::error;

use crate::envelope::Envelope;
use crate::web::state::AppState;

/// Shown in place of any server-side error message outside development.
pub const GENERIC_SERVER_ERROR: &str = "Something went very wrong!";

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub DomainError);

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DomainError::validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(DomainError::validation(rejection.body_text()))
    }
}

/// The unredacted error, stashed in response extensions for
/// [`expose_error_detail`].
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub message: String,
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!(error = %self.0, status = status.as_u16(), "request failed");
            GENERIC_SERVER_ERROR.to_string()
        } else {
            self.0.message().to_string()
        };

        let mut response = (status, Json(Envelope::failure(status.as_u16(), message))).into_response();
        response.extensions_mut().insert(ErrorReport {
            message: self.0.message().to_string(),
            detail: self.0.to_string(),
        });
        response
    }
}

/// In development, rewrites error envelopes to carry the real message and a
/// `detail` field.
pub async fn expose_error_detail(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if !state.config.expose_error_detail {
        return response;
    }
    let Some(report) = response.extensions().get::<ErrorReport>().cloned() else {
        return response;
    };

    let status = response.status();
    let mut body = Envelope::failure(status.as_u16(), report.message);
    body.detail = Some(report.detail);
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: DomainError) -> (StatusCode, serde_json::Value) {
        let response = ApiError(err).into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn client_errors_keep_their_message() {
        let (status, body) = body_of(DomainError::conflict("email taken")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], "fail");
        assert_eq!(body["message"], "email taken");
    }

    #[tokio::test]
    async fn server_errors_are_redacted() {
        let (status, body) = body_of(DomainError::internal("relation \"accounts\" does not exist")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], GENERIC_SERVER_ERROR);
        assert!(body.get("detail").is_none());

        let (status, _) = body_of(DomainError::unavailable("timed out")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
