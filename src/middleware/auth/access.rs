//! Bearer access token 検証 → Claims を request context に載せる
//!
//! - `Authorization: Bearer <jwt>` が無ければ MissingCredential で打ち切る
//! - 検証は TokenService に委譲する (署名 / exp / jti replay)
//! - 失敗理由は log にだけ出し、response は error mapper が一律 401 にする
use std::sync::Arc;

use axum::http::{HeaderMap, header};

use crate::context::Context;
use crate::error::AppError;
use crate::router::{BoxFuture, HandlerResult, Middleware, Next, Request};
use crate::services::auth::{CLAIMS, TokenService};

#[derive(Debug, Clone)]
pub struct AuthMiddleware {
    tokens: Arc<TokenService>,
}

impl AuthMiddleware {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

/// Token part of `Authorization: Bearer <token>`; the scheme is case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl Middleware for AuthMiddleware {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn process<'a>(
        &'a self,
        ctx: Context,
        req: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            let token = bearer_token(req.headers()).ok_or(AppError::MissingCredential)?;

            let claims = self.tokens.validate_token(token).await?;
            tracing::debug!(sub = ?claims.sub, "access token accepted");

            let ctx = ctx.with_service(&CLAIMS, claims);
            next.run(ctx, req).await
        })
    }
}
