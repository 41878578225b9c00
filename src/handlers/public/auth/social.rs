// handlers/public/auth/social.rs - OAuth2 login for clients

use axum::{extract::State, response::Redirect};
use serde::Deserialize;

use crate::error::ApiError;
use crate::handlers::extract::QueryParams;
use crate::services::SocialState;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginSocialQuery {
    pub provider: String,
    /// Where the browser lands after a successful login
    pub redirect_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginSocialSuccessQuery {
    pub state: String,
    pub code: String,
}

/// GET /api/client/auth/loginSocial?provider=&redirectUrl= - 307 to the provider
pub async fn login_social(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<LoginSocialQuery>,
) -> Result<Redirect, ApiError> {
    let url = state
        .auth
        .login_client_social(&query.provider, &query.redirect_url)
        .await?;
    Ok(Redirect::temporary(&url))
}

/// GET /api/client/auth/loginSocialSuccess?state=&code= - provider callback.
///
/// Redirects to the caller's `redirectUrl` with `accessCode=<refreshToken>`.
pub async fn login_social_success(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<LoginSocialSuccessQuery>,
) -> Result<Redirect, ApiError> {
    let social = SocialState::parse(&query.state)?;

    let info = state
        .auth
        .login_client_social_with_code(&social.provider, &query.code, &social.code_verifier)
        .await?;

    Ok(Redirect::temporary(&with_access_code(&social.redirect_url, &info.refresh_token)))
}

fn with_access_code(redirect_url: &str, access_code: &str) -> String {
    let separator = if redirect_url.contains('?') { '&' } else { '?' };
    let encoded: String = url::form_urlencoded::byte_serialize(access_code.as_bytes()).collect();
    format!("{}{}accessCode={}", redirect_url, separator, encoded)
}
