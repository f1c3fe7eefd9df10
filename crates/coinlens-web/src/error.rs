use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use coinlens_core::{DomainError, FetchError};
use serde::Serialize;

/// User-visible failure rendered as an inline banner by the dashboard.
///
/// `warning` banners cover missing selections; `error` banners cover failed
/// or empty upstream fetches. The body is stable JSON so the page can render
/// either without inspecting status codes.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: BannerKind,
    code: &'static str,
    message: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
enum BannerKind {
    Warning,
    Error,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    kind: BannerKind,
    code: &'a str,
    message: &'a str,
}

impl ApiError {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: BannerKind::Warning,
            code: "missing_selection",
            message: message.into(),
        }
    }
}

impl From<FetchError> for ApiError {
    fn from(error: FetchError) -> Self {
        let status = match &error {
            FetchError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            FetchError::EmptySeries => StatusCode::NOT_FOUND,
            FetchError::Transport(_) | FetchError::Status { .. } | FetchError::Malformed(_) => {
                StatusCode::BAD_GATEWAY
            }
        };
        Self {
            status,
            kind: BannerKind::Error,
            code: error.code(),
            message: error.to_string(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: BannerKind::Error,
            code: "invalid_selection",
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            kind: self.kind,
            code: self.code,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
