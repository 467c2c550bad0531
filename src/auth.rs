use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::{config::AppConfig, error::AuthError, models::LoginRequest};

/// Fixed lifetime of an issued token. There is no refresh or revocation path;
/// once past this window a token is terminally expired.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Claims
///
/// The payload structure embedded inside every issued token. Signed with the
/// server's secret and validated on every authenticated request; never
/// persisted server-side.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the authenticated identity's email.
    pub sub: String,
    /// Expiration Time (exp): timestamp after which the token must not be accepted.
    pub exp: usize,
    /// Issued At (iat): timestamp when the token was minted.
    pub iat: usize,
}

/// issue_token
///
/// The login path. Checks the presented credentials against the configured
/// identity and, on success, mints a signed token carrying the subject and a
/// 24-hour expiry. Rejects mismatched credentials with
/// `AuthError::InvalidCredentials`; nothing about which part mismatched is
/// revealed.
pub fn issue_token(config: &AppConfig, credentials: &LoginRequest) -> Result<String, AuthError> {
    if credentials.email != config.login_email || credentials.password != config.login_password {
        return Err(AuthError::InvalidCredentials);
    }

    let now = Utc::now();
    let claims = Claims {
        sub: credentials.email.clone(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|_| AuthError::InvalidToken)
}

/// verify_token
///
/// Decodes and validates a presented token, distinguishing a stale token
/// (`TokenExpired`) from one that is malformed or signed with a different
/// secret (`InvalidToken`). On success returns the embedded claims for the
/// caller to attach to the request context.
pub fn verify_token(config: &AppConfig, token: &str) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let mut validation = Validation::default();
    // Ensure expiration time validation is always active.
    validation.validate_exp = true;

    match decode::<Claims>(token, &decoding_key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) => match e.kind() {
            ErrorKind::ExpiredSignature => Err(AuthError::TokenExpired),
            // Bad signature, malformed token, and everything else.
            _ => Err(AuthError::InvalidToken),
        },
    }
}

/// AuthUser
///
/// The resolved identity of an authenticated request. Handlers take this as an
/// argument to require authentication and to know who is acting.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The token's subject, the email the identity logged in with.
    pub subject: String,
}

/// AuthUser Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AuthUser usable as a
/// function argument in any authenticated handler and as the basis of the
/// route-layer middleware. Extraction is pure token work:
/// 1. Dependency resolution: AppConfig (for the signing secret) from state.
/// 2. Bearer extraction: the `Authorization` header must carry `Bearer <token>`;
///    anything else counts as no token presented.
/// 3. Verification: signature and expiry via `verify_token`.
///
/// Rejection: the specific `AuthError`, which renders as 401 with a message
/// naming the failure mode.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingToken)?;

        let claims = verify_token(&config, token)?;

        Ok(AuthUser {
            subject: claims.sub,
        })
    }
}
