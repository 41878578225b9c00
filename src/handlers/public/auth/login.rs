// handlers/public/auth/login.rs - POST /api/{admin,client}/auth/login

use axum::extract::State;
use serde::Deserialize;

use crate::api::{ApiResult, Envelope};
use crate::handlers::extract::JsonBody;
use crate::services::{Audience, LoginInfo};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/**
 * Password login against the record store.
 *
 * Input: `{ "username": "a@example.com", "password": "..." }`
 *
 * Output data: `{ accessToken, expireTime, refreshToken, profile }`
 */
pub async fn admin_login(State(state): State<AppState>, JsonBody(request): JsonBody<LoginRequest>) -> ApiResult<LoginInfo> {
    login(&state, Audience::Admin, request).await
}

pub async fn client_login(State(state): State<AppState>, JsonBody(request): JsonBody<LoginRequest>) -> ApiResult<LoginInfo> {
    login(&state, Audience::Client, request).await
}

async fn login(state: &AppState, audience: Audience, request: LoginRequest) -> ApiResult<LoginInfo> {
    let info = state
        .auth
        .login(audience, &request.username, &request.password)
        .await?;
    Ok(Envelope::ok(info))
}
