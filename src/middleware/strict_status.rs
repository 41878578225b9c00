use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::api::EnvelopeStatus;

/// Copy the envelope status onto the HTTP status line
pub async fn strict_status(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    if let Some(EnvelopeStatus(code)) = response.extensions().get::<EnvelopeStatus>().copied() {
        if let Ok(status) = StatusCode::from_u16(code) {
            *response.status_mut() = status;
        }
    }
    response
}
