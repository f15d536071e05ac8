//! HTTP error mapping.
//!
//! Actions return `anyhow::Result`; the typed errors they carry are
//! recovered here with `downcast_ref` and turned into status codes.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::common::CrmError;
use crate::kernel::store::StoreError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// `"{what} not found"`, matching `CrmError::NotFound`
    pub fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, CrmError::NotFound(what.to_string()).to_string())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(crm) = err.downcast_ref::<CrmError>() {
            let status = match crm {
                CrmError::Conflict(_) | CrmError::BadRequest(_) => StatusCode::BAD_REQUEST,
                CrmError::NotFound(_) => StatusCode::NOT_FOUND,
            };
            return Self::new(status, crm.to_string());
        }

        if let Some(store) = err.downcast_ref::<StoreError>() {
            if store.is_unsupported_operation() {
                error!(error = %store, "Unsupported storage operation");
                return Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Unsupported operation: {}", store),
                );
            }
        }

        error!(error = ?err, "Request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}
