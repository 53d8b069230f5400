//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::SettingsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// Localized explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Message key the detail was rendered from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            code: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Map a domain error to Problem Details carrying an already localized
/// message
pub fn map_domain_error(error: &SettingsError, message: String) -> Problem {
    let problem = match error {
        e if e.is_validation() => Problem::new(StatusCode::BAD_REQUEST, "Validation Error"),

        SettingsError::Forbidden => Problem::new(StatusCode::FORBIDDEN, "Forbidden"),

        SettingsError::NotFound { key } => {
            tracing::error!(%key, "Settings row missing");
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Setting Not Found")
        }

        _ => Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
    };

    problem.with_detail(message).with_code(error.message_key())
}
