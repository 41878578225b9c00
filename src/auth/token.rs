use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use super::claims::SessionClaims;
use super::keys::{KeyError, KeyMaterial};
use crate::config::SecurityConfig;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("failed to sign token: {0}")]
    Sign(jsonwebtoken::errors::Error),

    #[error("invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),

    #[error("external token has no expiry")]
    ExternalMalformed,

    #[error("external token expired")]
    ExternalExpired,
}

/// Signs and verifies RS256 session tokens
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

#[derive(Serialize)]
struct Stamped<'a, P> {
    #[serde(flatten)]
    payload: &'a P,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct ExternalClaims {
    exp: Option<i64>,
}

impl TokenService {
    pub fn from_config(security: &SecurityConfig) -> Result<Self, KeyError> {
        let keys = KeyMaterial::load(security)?;
        Self::from_pem(keys.private_pem.as_bytes(), keys.public_pem.as_bytes())
    }

    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, KeyError> {
        let encoding = EncodingKey::from_rsa_pem(private_pem)
            .map_err(|source| KeyError::Invalid { kind: "private", source })?;
        let decoding = DecodingKey::from_rsa_pem(public_pem)
            .map_err(|source| KeyError::Invalid { kind: "public", source })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = 0;

        Ok(Self { encoding, decoding, validation })
    }

    /// Sign `payload` with `iat = now` and `exp = now + ttl_secs`.
    pub fn issue<P: Serialize>(&self, payload: &P, ttl_secs: u64) -> Result<String, TokenError> {
        let iat = Utc::now().timestamp();
        let exp = iat.saturating_add(i64::try_from(ttl_secs).unwrap_or(i64::MAX));
        let claims = Stamped { payload, iat, exp };

        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding).map_err(TokenError::Sign)
    }

    /// Check signature and expiry and decode the payload.
    pub fn verify<P: DeserializeOwned>(&self, token: &str) -> Result<P, TokenError> {
        decode::<P>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }

    /// A session is usable only while its embedded external token is unexpired too.
    pub fn authenticate(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let claims: SessionClaims = self.verify(token)?;
        check_external_token(&claims.session.ext_token, Utc::now().timestamp())?;
        Ok(claims)
    }
}

/// Read the `exp` of a token issued by the record store, without its key.
pub fn check_external_token(token: &str, now: i64) -> Result<(), TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<ExternalClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(TokenError::Invalid)?;

    match data.claims.exp {
        None => Err(TokenError::ExternalMalformed),
        Some(exp) if exp < now => Err(TokenError::ExternalExpired),
        Some(_) => Ok(()),
    }
}
