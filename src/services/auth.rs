use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use url::Url;

use super::audience::Audience;
use crate::auth::{SessionPayload, TokenService, UserProfile};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::pocketbase::{AuthResponse, OAuth2Code, RecordStore, USERS_COLLECTION};

/// Path the OAuth2 provider redirects back to
pub const SOCIAL_CALLBACK_PATH: &str = "/api/client/auth/loginSocialSuccess";

/// Tokens handed out after a successful login or refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInfo {
    pub access_token: String,
    /// Session lifetime in seconds
    pub expire_time: u64,
    /// The record store's own token, accepted by refreshToken
    pub refresh_token: String,
    pub profile: UserProfile,
}

/// OAuth2 state round-tripped through the provider as `provider-verifier-redirect`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialState {
    pub provider: String,
    pub code_verifier: String,
    pub redirect_url: String,
}

impl SocialState {
    pub fn encode(&self) -> String {
        format!("{}-{}-{}", self.provider, self.code_verifier, self.redirect_url)
    }

    /// The redirect URL may itself contain `-`, so only the first two split.
    pub fn parse(state: &str) -> Result<Self, ApiError> {
        let mut parts = state.splitn(3, '-');
        let provider = parts.next().unwrap_or_default();
        let code_verifier = parts.next().unwrap_or_default();
        let redirect_url = parts.next().unwrap_or_default();

        if provider.is_empty() || code_verifier.is_empty() || redirect_url.is_empty() {
            return Err(ApiError::required("State"));
        }

        Ok(Self {
            provider: provider.to_string(),
            code_verifier: code_verifier.to_string(),
            redirect_url: redirect_url.to_string(),
        })
    }
}

/// Password, refresh and OAuth2 logins against the record store
pub struct AuthService {
    store: Arc<dyn RecordStore>,
    tokens: Arc<TokenService>,
    token_ttl: u64,
    api_hostname: String,
    admin_token: String,
}

impl AuthService {
    const NAME: &'static str = "AuthService";

    pub fn new(store: Arc<dyn RecordStore>, tokens: Arc<TokenService>, config: &AppConfig) -> Self {
        Self {
            store,
            tokens,
            token_ttl: config.security.token_expiry_secs,
            api_hostname: config.server.api_hostname.clone(),
            admin_token: config.pocketbase.admin_token.clone(),
        }
    }

    pub fn callback_url(&self) -> String {
        format!("{}{}", self.api_hostname, SOCIAL_CALLBACK_PATH)
    }

    pub async fn login_admin(&self, username: &str, password: &str) -> Result<LoginInfo, ApiError> {
        self.login(Audience::Admin, username, password).await
    }

    pub async fn login_client(&self, username: &str, password: &str) -> Result<LoginInfo, ApiError> {
        self.login(Audience::Client, username, password).await
    }

    pub async fn refresh_token_admin(&self, username: &str, refresh_token: &str) -> Result<LoginInfo, ApiError> {
        self.refresh(Audience::Admin, username, refresh_token).await
    }

    pub async fn refresh_token_client(&self, username: &str, refresh_token: &str) -> Result<LoginInfo, ApiError> {
        self.refresh(Audience::Client, username, refresh_token).await
    }

    pub async fn login(&self, audience: Audience, username: &str, password: &str) -> Result<LoginInfo, ApiError> {
        let operation = op_name(audience, "login");
        require("Username", username)?;
        require("Password", password)?;

        let auth = self
            .store
            .auth_with_password(audience.auth_collection(), username, password)
            .await
            .map_err(|e| self.failed(operation, e.into()))?;

        let info = self.issue(audience, auth).map_err(|e| self.failed(operation, e))?;
        info!(audience = %audience, user_id = %info.profile.id, "login succeeded");
        Ok(info)
    }

    /// Refresh is refused when the refreshed account is not `username`.
    pub async fn refresh(&self, audience: Audience, username: &str, refresh_token: &str) -> Result<LoginInfo, ApiError> {
        let operation = op_name(audience, "refreshToken");
        require("Username", username)?;
        require("RefreshToken", refresh_token)?;

        let auth = self
            .store
            .auth_refresh(audience.auth_collection(), refresh_token)
            .await
            .map_err(|e| self.failed(operation, e.into()))?;

        let email = auth.record.fields.get("email").and_then(|v| v.as_str()).unwrap_or_default();
        if email != username {
            warn!(service = Self::NAME, operation, "refreshed account does not match username");
            return Err(ApiError::Unauthorized);
        }

        self.issue(audience, auth).map_err(|e| self.failed(operation, e))
    }

    /// Provider authorization URL with our state and callback filled in
    pub async fn login_client_social(&self, provider: &str, redirect_url: &str) -> Result<String, ApiError> {
        let operation = "loginClientSocial";
        require("Provider", provider)?;
        require("RedirectUrl", redirect_url)?;

        let methods = self
            .store
            .list_auth_methods(USERS_COLLECTION)
            .await
            .map_err(|e| self.failed(operation, e.into()))?;

        let Some(info) = methods.provider(provider) else {
            warn!(service = Self::NAME, operation, provider, "unknown or disabled provider");
            return Err(ApiError::NotFound);
        };

        let state = SocialState {
            provider: provider.to_string(),
            code_verifier: info.code_verifier.clone(),
            redirect_url: redirect_url.to_string(),
        };

        rewrite_auth_url(&info.auth_url, &state.encode(), &self.callback_url())
            .map_err(|e| self.failed(operation, e))
    }

    /// Exchange an OAuth2 code for a client session
    pub async fn login_client_social_with_code(
        &self,
        provider: &str,
        code: &str,
        code_verifier: &str,
    ) -> Result<LoginInfo, ApiError> {
        let operation = "loginClientSocialWithCode";
        require("Provider", provider)?;
        require("Code", code)?;
        require("CodeVerifier", code_verifier)?;

        let exchange = OAuth2Code {
            provider: provider.to_string(),
            code: code.to_string(),
            code_verifier: code_verifier.to_string(),
            redirect_url: self.callback_url(),
        };
        let admin_token = Some(self.admin_token.as_str()).filter(|t| !t.is_empty());

        let auth = self
            .store
            .auth_with_oauth2_code(USERS_COLLECTION, &exchange, admin_token)
            .await
            .map_err(|e| self.failed(operation, e.into()))?;

        self.issue(Audience::Client, auth).map_err(|e| self.failed(operation, e))
    }

    fn issue(&self, audience: Audience, auth: AuthResponse) -> Result<LoginInfo, ApiError> {
        let profile = UserProfile::from_record(&auth.record, audience.is_admin())
            .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

        let payload = SessionPayload {
            profile,
            ext_token: auth.token,
        };
        let access_token = self.tokens.issue(&payload, self.token_ttl)?;

        Ok(LoginInfo {
            access_token,
            expire_time: self.token_ttl,
            refresh_token: payload.ext_token,
            profile: payload.profile,
        })
    }

    fn failed(&self, operation: &str, err: ApiError) -> ApiError {
        error!(service = Self::NAME, operation, error = %err, "operation failed");
        err
    }
}

fn op_name(audience: Audience, action: &'static str) -> &'static str {
    match (audience, action) {
        (Audience::Admin, "login") => "loginAdmin",
        (Audience::Client, "login") => "loginClient",
        (Audience::Admin, _) => "refreshTokenAdmin",
        (Audience::Client, _) => "refreshTokenClient",
    }
}

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::required(field))
    } else {
        Ok(())
    }
}

/// Replace `state` and `redirect_uri` in the provider URL, keeping other pairs in order.
fn rewrite_auth_url(auth_url: &str, state: &str, callback: &str) -> Result<String, ApiError> {
    let mut url = Url::parse(auth_url)
        .map_err(|e| ApiError::internal_server_error(format!("invalid provider auth url: {}", e)))?;

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "state" && k != "redirect_uri")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("state", state)
        .append_pair("redirect_uri", callback);

    Ok(url.to_string())
}
