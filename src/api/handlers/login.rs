/*
 * Responsibility
 * - GET /login: Basic 認証 → access token (plain text) を返す
 * - 資格情報の検証は CredentialVerifier, 発行は TokenService に委譲
 */
use axum::{
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::context::Context;
use crate::error::AppError;
use crate::router::{HandlerResult, Request};
use crate::services::auth::{CREDENTIALS, NewClaims, TOKEN_SERVICE};

/// Custom claim carrying the login name.
pub const USERNAME_CLAIM: &str = "username";

#[derive(Debug, PartialEq, Eq)]
struct BasicCredentials {
    username: String,
    password: String,
}

fn basic_credentials(headers: &HeaderMap) -> Result<BasicCredentials, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::MissingCredential)?;

    let (scheme, encoded) = value.split_once(' ').ok_or(AppError::MissingCredential)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AppError::MissingCredential);
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AppError::InvalidCredentials)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AppError::InvalidCredentials)?;
    let (username, password) = decoded
        .split_once(':')
        .ok_or(AppError::InvalidCredentials)?;

    Ok(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

pub async fn login(ctx: Context, req: Request) -> HandlerResult {
    let credentials = basic_credentials(req.headers())?;

    let verifier = ctx.service(&CREDENTIALS)?;
    let tokens = ctx.service(&TOKEN_SERVICE)?;

    let principal = verifier
        .verify(&credentials.username, &credentials.password)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let claims = NewClaims::for_subject(principal.user_id.to_string())
        .with_claim(USERNAME_CLAIM, principal.username)
        .map_err(|_| AppError::Internal)?;

    let issued = tokens.generate_token(claims)?;
    tracing::info!(
        sub = ?issued.claims.sub,
        expires_at = ?issued.claims.expires_at(),
        "access token issued"
    );

    Ok((
        StatusCode::OK,
        [(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))],
        issued.token,
    )
        .into_response())
}
