// HTTP API Error Types
use axum::response::IntoResponse;
use serde_json::Value;

use crate::api::envelope::{ClientError, Envelope};
use crate::auth::TokenError;
use crate::filter::FilterError;
use crate::pocketbase::StoreError;
use crate::services::MappingError;

pub const MSG_NOT_FOUND: &str = "The requested resource could not be found.";
pub const MSG_UNAUTHORIZED: &str = "The user does not have the necessary credentials.";
pub const MSG_FORBIDDEN: &str = "The user might not have the necessary permissions for a resource.";
pub const MSG_BAD_REQUEST: &str =
    "The server cannot or will not process the request due to an apparent client error";
pub const MSG_INTERNAL: &str =
    "An unexpected condition was encountered and no more specific message is suitable";

/// Field-level validation codes (HTTP 400 * 10 + n)
pub const CODE_REQUIRED: u16 = 4001;
pub const CODE_TYPE: u16 = 4002;

/// Every failure a handler can report, rendered as an envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 400 with a field-specific code
    Validation { code: u16, message: String },

    // 400
    BadRequest(String),

    // 401
    Unauthorized,

    // 403
    Forbidden,

    // 404
    NotFound,

    // 500, message is the downstream cause
    InternalServerError(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation { .. } => 400,
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized => 401,
            ApiError::Forbidden => 403,
            ApiError::NotFound => 404,
            ApiError::InternalServerError(_) => 500,
        }
    }

    /// Fixed envelope sentence for the error kind
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } | ApiError::BadRequest(_) => MSG_BAD_REQUEST,
            ApiError::Unauthorized => MSG_UNAUTHORIZED,
            ApiError::Forbidden => MSG_FORBIDDEN,
            ApiError::NotFound => MSG_NOT_FOUND,
            ApiError::InternalServerError(_) => MSG_INTERNAL,
        }
    }

    pub fn exception(&self) -> ClientError {
        match self {
            ApiError::Validation { code, message } => ClientError::new(code, message.clone()),
            ApiError::BadRequest(message) => ClientError::new(400, message.clone()),
            ApiError::Unauthorized => ClientError::new(401, "UnauthorizedError"),
            ApiError::Forbidden => ClientError::new(403, "ForbiddenError"),
            ApiError::NotFound => ClientError::new(404, "NotFoundError"),
            ApiError::InternalServerError(message) => ClientError::new(500, message.clone()),
        }
    }

    pub fn to_envelope(&self) -> Envelope<Value> {
        Envelope::failure(self.status_code(), self.message(), Some(self.exception()))
    }
}

impl ApiError {
    /// `<Field> is required.`
    pub fn required(field: &str) -> Self {
        ApiError::Validation {
            code: CODE_REQUIRED,
            message: format!("{} is required.", field.trim()),
        }
    }

    /// `<Field> is not valid <type> type.`
    pub fn type_error(field: &str, field_type: &str) -> Self {
        ApiError::Validation {
            code: CODE_TYPE,
            message: format!("{} is not valid {} type.", field.trim(), field_type),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            other => ApiError::internal_server_error(other.to_string()),
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::InvalidField(_) => ApiError::type_error("FilterField", "field"),
            FilterError::InvalidValue(_) => ApiError::type_error("FilterValue", "string"),
            FilterError::InvalidSortField(_) => ApiError::type_error("SortField", "field"),
        }
    }
}

impl From<MappingError> for ApiError {
    fn from(err: MappingError) -> Self {
        ApiError::internal_server_error(err.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Sign(_) | TokenError::Key(_) => ApiError::internal_server_error(err.to_string()),
            _ => ApiError::Unauthorized,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation { message, .. } => write!(f, "{}", message),
            ApiError::BadRequest(message) | ApiError::InternalServerError(message) => {
                write!(f, "{}", message)
            }
            other => write!(f, "{}", other.message()),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::InternalServerError(cause) = &self {
            tracing::debug!(cause = %cause, "rendering internal error envelope");
        }
        self.to_envelope().into_response()
    }
}
