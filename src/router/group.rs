use std::sync::Arc;

use axum::http::Method;

use crate::router::{Chain, Middleware};

/// Routes sharing a path prefix and a middleware stack.
///
/// Group middleware runs before any middleware of the individual route.
#[derive(Default)]
pub struct RouteGroup {
    prefix: String,
    middleware: Vec<Arc<dyn Middleware>>,
    routes: Vec<(Method, String, Chain)>,
}

impl RouteGroup {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn route(mut self, method: Method, path: &str, chain: Chain) -> Self {
        self.routes
            .push((method, format!("{}{}", self.prefix, path), chain));
        self
    }

    pub(crate) fn into_routes(self) -> impl Iterator<Item = (Method, String, Chain)> {
        let middleware = self.middleware;
        self.routes
            .into_iter()
            .map(move |(method, path, chain)| (method, path, chain.wrap(&middleware)))
    }
}
