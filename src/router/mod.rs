//! Exact-match router over `(method, path)`.
//!
//! Independent of axum's own routing: the axum app forwards every request to
//! [`Router::dispatch`] through a fallback, and this module decides which chain
//! runs. Failures are turned into responses here, in one place.
pub mod chain;
pub mod group;

use std::collections::HashMap;

use axum::http::{HeaderName, Method};
use axum::response::IntoResponse;
use thiserror::Error;

use crate::context::{Context, ServiceKey};
use crate::error::AppError;

pub use chain::{BoxFuture, Chain, HandlerResult, Middleware, Next};
pub use group::RouteGroup;

pub type Request = axum::extract::Request;
pub type Response = axum::response::Response;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Per-request binding with what the router saw.
pub static REQUEST_INFO: ServiceKey<RequestInfo> = ServiceKey::new("request_info");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    pub method: Method,
    pub path: String,
    pub request_id: Option<String>,
}

impl RequestInfo {
    fn from_request(req: &Request) -> Self {
        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            request_id: req
                .headers()
                .get(&REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("route already registered: {method} {path}")]
    DuplicateRoute { method: Method, path: String },
    #[error("no route for {path}")]
    NotFound { path: String },
    #[error("{method} not allowed for {path}")]
    MethodNotAllowed {
        method: Method,
        path: String,
        allowed: Vec<Method>,
    },
}

#[derive(Debug, Default)]
pub struct Router {
    // Methods kept in registration order for the Allow header.
    routes: HashMap<String, Vec<(Method, Chain)>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        method: Method,
        path: impl Into<String>,
        chain: Chain,
    ) -> Result<(), RouterError> {
        let path = path.into();
        let methods = self.routes.entry(path.clone()).or_default();

        if methods.iter().any(|(m, _)| *m == method) {
            return Err(RouterError::DuplicateRoute { method, path });
        }

        tracing::debug!(%method, %path, middleware = ?chain.names(), "route registered");
        methods.push((method, chain));
        Ok(())
    }

    /// Registers every route of `group` under its prefix.
    pub fn mount(&mut self, group: RouteGroup) -> Result<(), RouterError> {
        for (method, path, chain) in group.into_routes() {
            self.register(method, path, chain)?;
        }
        Ok(())
    }

    pub fn resolve(&self, method: &Method, path: &str) -> Result<&Chain, RouterError> {
        let methods = self.routes.get(path).ok_or_else(|| RouterError::NotFound {
            path: path.to_string(),
        })?;

        methods
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, chain)| chain)
            .ok_or_else(|| RouterError::MethodNotAllowed {
                method: method.clone(),
                path: path.to_string(),
                allowed: methods.iter().map(|(m, _)| m.clone()).collect(),
            })
    }

    /// Runs the matching chain with a context derived from `root`.
    ///
    /// Handlers and middleware only return errors; the response for a failure
    /// is written here, once.
    pub async fn dispatch(&self, root: &Context, req: Request) -> Response {
        let info = RequestInfo::from_request(&req);

        let result = match self.resolve(&info.method, &info.path) {
            Ok(chain) => {
                let ctx = root.with_service(&REQUEST_INFO, info.clone());
                chain.run(ctx, req).await
            }
            Err(e) => Err(AppError::from(e)),
        };

        match result {
            Ok(response) => response,
            Err(err) => {
                err.report(
                    info.method.as_str(),
                    &info.path,
                    info.request_id.as_deref(),
                );
                err.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::StatusCode,
    };

    use super::*;

    async fn ok(_ctx: Context, _req: Request) -> HandlerResult {
        Ok("ok".into_response())
    }

    async fn echo_request_id(ctx: Context, _req: Request) -> HandlerResult {
        let info = ctx.service(&REQUEST_INFO)?;
        Ok(info.request_id.unwrap_or_default().into_response())
    }

    async fn needs_missing_service(ctx: Context, _req: Request) -> HandlerResult {
        static ABSENT: ServiceKey<u8> = ServiceKey::new("absent");
        ctx.service(&ABSENT)?;
        Ok(StatusCode::OK.into_response())
    }

    fn request(method: Method, uri: &str) -> Request {
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn stores_router() -> Router {
        let mut router = Router::new();
        router
            .register(Method::GET, "/api/stores", Chain::new(ok))
            .unwrap();
        router
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut router = stores_router();
        let err = router
            .register(Method::GET, "/api/stores", Chain::new(ok))
            .unwrap_err();
        assert!(matches!(err, RouterError::DuplicateRoute { .. }));

        router
            .register(Method::POST, "/api/stores", Chain::new(ok))
            .unwrap();
    }

    #[test]
    fn resolve_distinguishes_not_found_from_wrong_method() {
        let router = stores_router();

        assert!(router.resolve(&Method::GET, "/api/stores").is_ok());
        assert!(matches!(
            router.resolve(&Method::POST, "/api/stores"),
            Err(RouterError::MethodNotAllowed { allowed, .. }) if allowed == [Method::GET]
        ));
        assert!(matches!(
            router.resolve(&Method::GET, "/unknown"),
            Err(RouterError::NotFound { .. })
        ));
        // exact match only
        assert!(router.resolve(&Method::GET, "/api/stores/").is_err());
    }

    #[tokio::test]
    async fn dispatch_runs_matching_chain() {
        let router = stores_router();
        let response = router
            .dispatch(&Context::new(), request(Method::GET, "/api/stores"))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn dispatch_maps_routing_failures() {
        let router = stores_router();
        let root = Context::new();

        let response = router
            .dispatch(&root, request(Method::POST, "/api/stores"))
            .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["allow"], "GET");

        let response = router.dispatch(&root, request(Method::GET, "/unknown")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn request_info_is_bound_per_request() {
        let mut router = Router::new();
        router
            .register(Method::GET, "/id", Chain::new(echo_request_id))
            .unwrap();

        let mut req = request(Method::GET, "/id");
        req.headers_mut()
            .insert(REQUEST_ID_HEADER, "abc-123".parse().unwrap());
        let response = router.dispatch(&Context::new(), req).await;

        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"abc-123");
    }

    #[tokio::test]
    async fn missing_service_is_a_500() {
        let mut router = Router::new();
        router
            .register(Method::GET, "/broken", Chain::new(needs_missing_service))
            .unwrap();

        let response = router
            .dispatch(&Context::new(), request(Method::GET, "/broken"))
            .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
