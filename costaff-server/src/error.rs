// costaff-server/src/error.rs

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use costaff_common::Error;

/// HTTP wrapper around the domain error. Internal failure detail stays in
/// the server log; clients get the status and a short message.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotConfigured(_) | Error::Parse(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("request failed: {}", self.0);
            "Internal server error".to_string()
        } else {
            match &self.0 {
                Error::Unauthorized(m)
                | Error::Forbidden(m)
                | Error::NotConfigured(m)
                | Error::Parse(m)
                | Error::NotFound(m)
                | Error::Conflict(m) => m.clone(),
                other => other.to_string(),
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_401_and_403() {
        assert_eq!(
            ApiError(Error::Unauthorized("no header".into())).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError(Error::Forbidden("not a member".into())).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn setup_and_input_errors_map_to_400() {
        assert_eq!(
            ApiError(Error::NotConfigured("API key not configured".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(Error::Parse("bad uuid".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn missing_rows_map_to_404_and_duplicates_to_409() {
        assert_eq!(
            ApiError(Error::NotFound("conversation".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(Error::Conflict("already submitted".into())).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn everything_else_is_a_500() {
        assert_eq!(
            ApiError(Error::Provider("upstream timeout".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError(Error::Decryption("bad tag".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
