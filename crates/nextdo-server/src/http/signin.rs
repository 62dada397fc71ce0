use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::app::AppState;
use crate::auth::{AuthError, TOKEN_COOKIE};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub password: String,
}

/// POST /api/signin
///
/// Exchanges the configured password for a token, returned in the body and
/// as the `token` cookie.
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;

    let signer = state
        .signer
        .as_ref()
        .ok_or_else(|| ApiError::BadRequest("Authentication is disabled".to_string()))?;

    if !signer.password_matches(&request.password) {
        warn!("sign-in rejected");
        return Err(AuthError::WrongPassword.into());
    }

    let token = signer.issue(Utc::now().timestamp());
    let cookie = format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Strict",
        TOKEN_COOKIE,
        token,
        signer.ttl_secs()
    );
    info!("sign-in accepted");

    Ok(([(header::SET_COOKIE, cookie)], Json(json!({ "token": token }))).into_response())
}
