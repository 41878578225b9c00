use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use super::claims::{SessionClaims, UserProfile};
use crate::error::ApiError;

/// The authenticated caller, stashed in request extensions by the auth gate
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub profile: UserProfile,
    pub ext_token: String,
}

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.profile.id
    }

    pub fn is_admin(&self) -> bool {
        self.profile.is_admin_user
    }
}

impl From<SessionClaims> for CurrentUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            profile: claims.session.profile,
            ext_token: claims.session.ext_token,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}
