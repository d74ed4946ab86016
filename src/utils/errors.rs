use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Application-level error carrying the HTTP status it maps to.
///
/// Every failure surfaces to the client as `{"error": "<message>"}` with the
/// corresponding status code. Downstream failures that reach the blanket
/// `From` impl become 500s; handlers map expected upstream rejections to the
/// right 4xx explicitly.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    /// 400 — client data failed validation. Never reached after a mutation.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, anyhow!("{}", msg.into()))
    }

    /// 401 — missing/invalid/expired session or bad credentials.
    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!("{}", msg.into()))
    }

    /// 403 — authenticated but wrong role, or bad admin secret.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow!("{}", msg.into()))
    }

    /// 404 — profile/document absent.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, anyhow!("{}", msg.into()))
    }

    /// 429 — IP or per-email throttle tripped.
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, anyhow!("{}", msg.into()))
    }

    /// 500 — unexpected failure in a downstream service call.
    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status.as_u16(), error = %self.error, "request failed");
        }

        let body = Json(json!({
            "error": self.error.to_string()
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::invalid_input("x").status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::unauthenticated("x").status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::forbidden("x").status, StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("x").status, StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::rate_limited("x").status,
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_blanket_from_is_internal() {
        let err: AppError = std::io::Error::other("boom").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_message_preserved() {
        let err = AppError::forbidden("Admin secret requerido o incorrecto");
        assert_eq!(
            err.error.to_string(),
            "Admin secret requerido o incorrecto"
        );
    }
}
