//! Password sign-in and signed session tokens.
//!
//! A token is `<expiry-unix>.<hex hmac>`. The HMAC-SHA256 covers the expiry
//! and a digest of the configured password, so changing the password
//! invalidates every token issued before.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, warn};

use crate::app::AppState;
use crate::config::ServerConfig;
use crate::error::ApiError;

type HmacSha256 = Hmac<Sha256>;

/// Cookie carrying the session token.
pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required")]
    Missing,
    #[error("Malformed token")]
    Malformed,
    #[error("Token expired")]
    Expired,
    #[error("Invalid token")]
    BadSignature,
    #[error("Wrong password")]
    WrongPassword,
}

#[derive(Clone)]
pub struct TokenSigner {
    mac: HmacSha256,
    password_digest: [u8; 32],
    ttl_secs: i64,
}

impl TokenSigner {
    /// Returns `None` when no password is configured.
    pub fn from_config(config: &ServerConfig) -> Option<Self> {
        let password = config.password.as_deref().filter(|p| !p.is_empty())?;
        let password_digest: [u8; 32] = Sha256::digest(password.as_bytes()).into();

        let mac = match config.jwt_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => HmacSha256::new_from_slice(key.as_bytes()),
            None => HmacSha256::new_from_slice(&password_digest),
        }
        .ok()?;

        let ttl_secs = i64::try_from(config.token_ttl_hours)
            .unwrap_or(i64::MAX)
            .saturating_mul(3600);

        Some(Self {
            mac,
            password_digest,
            ttl_secs,
        })
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        let digest: [u8; 32] = Sha256::digest(candidate.as_bytes()).into();
        digest == self.password_digest
    }

    pub fn issue(&self, now: i64) -> String {
        let expiry = now.saturating_add(self.ttl_secs);
        let signature = self.signature(expiry).finalize().into_bytes();
        format!("{}.{}", expiry, hex::encode(signature))
    }

    pub fn verify(&self, token: &str, now: i64) -> Result<(), AuthError> {
        let (expiry, signature) = token.split_once('.').ok_or(AuthError::Malformed)?;
        let expiry: i64 = expiry.parse().map_err(|_| AuthError::Malformed)?;
        let signature = hex::decode(signature).map_err(|_| AuthError::Malformed)?;

        self.signature(expiry)
            .verify_slice(&signature)
            .map_err(|_| AuthError::BadSignature)?;

        if expiry <= now {
            return Err(AuthError::Expired);
        }
        Ok(())
    }

    fn signature(&self, expiry: i64) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(expiry.to_string().as_bytes());
        mac.update(b".");
        mac.update(&self.password_digest);
        mac
    }
}

/// Finds the session token in `Authorization: Bearer` or the `token` cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == TOKEN_COOKIE).then_some(value)
        })
}

/// Rejects requests without a valid token while a password is configured.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(signer) = &state.signer {
        let token = extract_token(request.headers()).ok_or(AuthError::Missing)?;
        signer
            .verify(token, Utc::now().timestamp())
            .inspect_err(|e| warn!(path = %request.uri().path(), reason = %e, "token rejected"))?;
        debug!(path = %request.uri().path(), "token accepted");
    }
    Ok(next.run(request).await)
}
