use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Closed set of application errors. Every variant carries the HTTP status
/// it maps to, so a request can never leave the error surface unanswered.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    DependencyUnavailable(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub status: &'static str,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DependencyUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let message = match self {
            // Internal detail is logged, never sent to the client
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        ErrorBody {
            message,
            status: "error",
            status_code: self.status().as_u16(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(e) = &self {
            tracing::error!(error = ?e, "request_failed");
        }
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_map_to_declared_status_codes() {
        let cases = [
            (AppError::BadRequest("bad".into()), 400),
            (AppError::Unauthorized("no".into()), 401),
            (AppError::NotFound("missing".into()), 404),
            (AppError::Conflict("dup".into()), 409),
            (AppError::DependencyUnavailable("redis".into()), 503),
            (AppError::Internal(anyhow::anyhow!("boom")), 500),
        ];
        for (err, code) in cases {
            assert_eq!(err.status().as_u16(), code);
            assert_eq!(err.body().status_code, code);
        }
    }

    #[test]
    fn body_carries_the_variant_message() {
        let err = AppError::Unauthorized("Token is invalid. Please login again.".into());
        let body = err.body();
        assert_eq!(body.message, "Token is invalid. Please login again.");
        assert_eq!(body.status, "error");
    }

    #[test]
    fn internal_errors_never_leak_detail() {
        let err = AppError::Internal(anyhow::anyhow!("connection refused to 10.0.0.3"));
        assert_eq!(err.body().message, "Internal server error");
    }
}
