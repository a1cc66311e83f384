//! # API Error Type
//!
//! Unified error type for services and HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Stockroom                              │
//! │                                                                         │
//! │  Handler ──► Service ──► Result<T, ApiError>                            │
//! │                               │                                         │
//! │           ┌───────────────────┼─────────────────────┐                   │
//! │           ▼                   ▼                     ▼                   │
//! │     CoreError            DbError              JSON rejection            │
//! │     422 / 404            500                  400 (or axum's status)    │
//! │     { "err": {           { "message":         { "message":             │
//! │       "code",              "<raw>" }            "<reason>" }           │
//! │       "message" } }                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use stockroom_core::CoreError;
use stockroom_db::DbError;
use thiserror::Error;
use tracing::error;

/// Errors a service call or request can end in.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A validation or business rule failed
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The store failed
    #[error(transparent)]
    Db(#[from] DbError),

    /// The request body could not be read as JSON
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

/// Result type for service operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Body for domain failures.
///
/// ```json
/// { "err": { "code": "stock_problem", "message": "Such amount is not permitted to sell" } }
/// ```
#[derive(Debug, Serialize)]
struct ErrorBody {
    err: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

/// Body for everything else.
#[derive(Debug, Serialize)]
struct MessageBody {
    message: String,
}

impl ApiError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(CoreError::SaleNotFound | CoreError::StockProblem) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Core(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Rejected { status, .. } => *status,
        }
    }

    /// The domain error, if this is one.
    pub fn core(&self) -> Option<&CoreError> {
        match self {
            ApiError::Core(err) => Some(err),
            _ => None,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection {
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };

        ApiError::Rejected {
            status,
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            ApiError::Core(err) => {
                let body = ErrorBody {
                    err: ErrorDetail {
                        code: err.code(),
                        message: err.to_string(),
                    },
                };
                (status, Json(body)).into_response()
            }
            ApiError::Db(err) => {
                error!(error = %err, "Store operation failed");
                let body = MessageBody {
                    message: err.to_string(),
                };
                (status, Json(body)).into_response()
            }
            ApiError::Rejected { message, .. } => {
                (status, Json(MessageBody { message })).into_response()
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
