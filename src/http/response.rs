//! Error responses.
//!
//! # Responsibilities
//! - Map every failure to the JSON error envelope `{ "success": false, "error": ... }`
//! - Keep gateway failures (502/504) distinct from downstream error bodies
//! - Log internal error detail without surfacing it to the caller

use axum::{
    extract::rejection::JsonRejection,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// HTTP-facing error taxonomy shared by every service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client input error, optionally with field-level failures.
    #[error("{message}")]
    BadRequest {
        message: String,
        details: Vec<String>,
    },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Route not found: {path}")]
    RouteNotFound { path: String },

    #[error("Method {method} not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },

    /// Unexpected failure; `message` is the public text.
    #[error("{message}")]
    Internal { message: String },

    #[error("Bad gateway: target `{target}` is unreachable")]
    BadGateway { target: String },

    #[error("Gateway timeout: target `{target}` did not respond")]
    GatewayTimeout { target: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// A 400 carrying field-level validation failures.
    pub fn validation(details: Vec<String>) -> Self {
        ApiError::BadRequest {
            message: "Validation error".to_string(),
            details,
        }
    }

    /// A 500 with a generic public message; `cause` is only logged.
    pub fn internal(message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        let message = message.into();
        tracing::error!(error = %cause, "{message}");
        ApiError::Internal { message }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) | ApiError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            ApiError::GatewayTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert("success".into(), Value::Bool(false));

        match self {
            ApiError::BadRequest { message, details } => {
                body.insert("error".into(), json!(message));
                if !details.is_empty() {
                    body.insert("details".into(), json!(details));
                }
            }
            ApiError::Unauthorized(message)
            | ApiError::NotFound(message)
            | ApiError::Internal { message } => {
                body.insert("error".into(), json!(message));
            }
            ApiError::RouteNotFound { path } => {
                body.insert("error".into(), json!("Route not found"));
                body.insert("path".into(), json!(path));
            }
            ApiError::MethodNotAllowed { method, path } => {
                body.insert("error".into(), json!("Method not allowed"));
                body.insert("method".into(), json!(method));
                body.insert("path".into(), json!(path));
            }
            ApiError::BadGateway { target } => {
                body.insert("error".into(), json!("Bad gateway"));
                body.insert("target".into(), json!(target));
            }
            ApiError::GatewayTimeout { target } => {
                body.insert("error".into(), json!("Gateway timeout"));
                body.insert("target".into(), json!(target));
            }
        }
        Value::Object(body)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// Fallback handler for paths no route owns.
pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound {
        path: uri.path().to_string(),
    }
}

/// Method fallback for routes that exist under other methods.
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
