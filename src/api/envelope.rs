use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub type ApiResult<T> = Result<Envelope<T>, ApiError>;

/// Error detail carried inside a failed envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientError {
    pub error_code: String,
    pub error_message: String,
}

impl ClientError {
    pub fn new(error_code: impl ToString, error_message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.to_string(),
            error_message: error_message.into(),
        }
    }
}

/// Uniform JSON wrapper returned by every endpoint.
///
/// The outcome lives in `status` and `successful`; the transport status is
/// 200 unless the strict-status layer copies [`EnvelopeStatus`] onto it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub server_date_time: DateTime<Utc>,
    pub status: u16,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<ClientError>,
    pub data: Option<T>,
    pub successful: bool,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            server_date_time: Utc::now(),
            status: StatusCode::OK.as_u16(),
            msg: String::new(),
            exception: None,
            data: Some(data),
            successful: true,
        }
    }

    pub fn failure(status: u16, msg: impl Into<String>, exception: Option<ClientError>) -> Self {
        Self {
            server_date_time: Utc::now(),
            status,
            msg: msg.into(),
            exception,
            data: None,
            successful: false,
        }
    }
}

/// Envelope status attached to the response for the strict-status layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeStatus(pub u16);

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        let mut response = (StatusCode::OK, Json(self)).into_response();
        response.extensions_mut().insert(EnvelopeStatus(status));
        response
    }
}

/// One page of mapped records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<T> {
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub elements: Vec<T>,
    pub has_previous: bool,
    pub has_more: bool,
}

impl<T> SearchResult<T> {
    pub fn new(page: u32, size: u32, total_elements: u64, total_pages: u32, elements: Vec<T>) -> Self {
        Self {
            page,
            size,
            total_elements,
            total_pages,
            elements,
            has_previous: page > 1,
            has_more: page < total_pages,
        }
    }
}
