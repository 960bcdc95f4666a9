/*
 * Responsibility
 * - URL 構造を定義
 * - /health, /login は公開, /api 以下は Bearer 必須 (RouteGroup に auth middleware)
 */
use std::sync::Arc;

use axum::http::Method;

use crate::api::handlers::{health::health, login::login, stores::list_stores};
use crate::middleware::auth::AuthMiddleware;
use crate::router::{Chain, RouteGroup, Router, RouterError};
use crate::services::auth::TokenService;

pub fn routes(tokens: Arc<TokenService>) -> Result<Router, RouterError> {
    let mut router = Router::new();

    router.register(Method::GET, "/health", Chain::new(health))?;
    router.register(Method::GET, "/login", Chain::new(login))?;

    router.mount(
        RouteGroup::new("/api")
            .layer(AuthMiddleware::new(tokens))
            .route(Method::GET, "/stores", Chain::new(list_stores)),
    )?;

    Ok(router)
}
