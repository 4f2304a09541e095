//! JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gwl_common::SelectionError;
use serde::Serialize;

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub description: String,
}

/// An error ready to be sent to the client.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub description: String,
}

impl ApiError {
    /// A required query parameter was not supplied.
    pub fn missing_parameter(name: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "MissingParameterValue",
            description: format!("Missing required query parameter '{}'", name),
        }
    }

    /// A query parameter could not be parsed.
    pub fn invalid_parameter(name: &str, value: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "InvalidParameterValue",
            description: format!("Invalid value '{}' for query parameter '{}'", value, name),
        }
    }

    pub fn internal(description: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "InternalError",
            description: description.into(),
        }
    }
}

impl From<SelectionError> for ApiError {
    fn from(err: SelectionError) -> Self {
        Self {
            status: StatusCode::from_u16(err.http_status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code: err.code(),
            description: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code,
            description: self.description,
        };
        (self.status, Json(body)).into_response()
    }
}
