use axum::{http::{StatusCode, HeaderValue}, response::{IntoResponse, Response}, Json};
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")] pub error: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    Unauthorized { message: &'static str },
    Forbidden { message: &'static str },
    NotFound { code: &'static str, message: &'static str },
    Conflict { code: &'static str, message: String },
    BadRequest { code: &'static str, message: String },
    /// Outbound payment-provider failure; `error` carries the provider message.
    Gateway { error: String },
    Internal { message: String },
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(e: E) -> Self {
        Self::Internal { message: e.to_string() }
    }
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest { code, message: message.into() }
    }
    pub fn gateway<E: std::fmt::Display>(e: E) -> Self {
        Self::Gateway { error: e.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body, error_code) = match self {
            ApiError::Unauthorized { message } => (
                StatusCode::UNAUTHORIZED,
                ErrorBody { message: message.into(), error: None },
                "unauthorized",
            ),
            ApiError::Forbidden { message } => (
                StatusCode::FORBIDDEN,
                ErrorBody { message: message.into(), error: None },
                "forbidden",
            ),
            ApiError::NotFound { code, message } => (
                StatusCode::NOT_FOUND,
                ErrorBody { message: message.into(), error: None },
                code,
            ),
            ApiError::Conflict { code, message } => (
                StatusCode::CONFLICT,
                ErrorBody { message, error: None },
                code,
            ),
            ApiError::BadRequest { code, message } => (
                StatusCode::BAD_REQUEST,
                ErrorBody { message, error: None },
                code,
            ),
            ApiError::Gateway { error } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody { message: "Payment Failed".into(), error: Some(error) },
                "gateway_error",
            ),
            ApiError::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody { message, error: None },
                "internal_error",
            ),
        };
        let mut resp = (status, Json(body)).into_response();
        if let Ok(val) = HeaderValue::from_str(error_code) {
            resp.headers_mut().insert("X-Error-Code", val);
        }
        resp
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
