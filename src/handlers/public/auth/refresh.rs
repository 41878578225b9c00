// handlers/public/auth/refresh.rs - POST /api/{admin,client}/auth/refreshToken

use axum::extract::State;
use serde::Deserialize;

use crate::api::{ApiResult, Envelope};
use crate::handlers::extract::JsonBody;
use crate::services::{Audience, LoginInfo};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub username: String,
    /// The `refreshToken` returned by login
    pub refresh_token: String,
}

/// Trade a refresh token for a new session; the account must still be `username`.
pub async fn admin_refresh(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RefreshTokenRequest>,
) -> ApiResult<LoginInfo> {
    refresh(&state, Audience::Admin, request).await
}

pub async fn client_refresh(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RefreshTokenRequest>,
) -> ApiResult<LoginInfo> {
    refresh(&state, Audience::Client, request).await
}

async fn refresh(state: &AppState, audience: Audience, request: RefreshTokenRequest) -> ApiResult<LoginInfo> {
    let info = state
        .auth
        .refresh(audience, &request.username, &request.refresh_token)
        .await?;
    Ok(Envelope::ok(info))
}
