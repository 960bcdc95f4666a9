//! Middleware chain: an ordered list of middleware in front of one handler.
//!
//! Each middleware gets the request context and a [`Next`] it may run, or
//! drop to short-circuit (returning an error, or writing a response itself).
use std::{future::Future, pin::Pin, sync::Arc};

use crate::context::Context;
use crate::error::AppError;
use crate::router::{Request, Response};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type HandlerResult = Result<Response, AppError>;

/// Terminal element of a chain.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: Context, req: Request) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut> Handler for F
where
    F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, ctx: Context, req: Request) -> BoxFuture<'static, HandlerResult> {
        Box::pin(self(ctx, req))
    }
}

pub trait Middleware: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn process<'a>(
        &'a self,
        ctx: Context,
        req: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult>;
}

/// The rest of the chain after the current middleware.
pub struct Next<'a> {
    middleware: &'a [Arc<dyn Middleware>],
    handler: &'a dyn Handler,
}

impl<'a> Next<'a> {
    pub fn run(self, ctx: Context, req: Request) -> BoxFuture<'a, HandlerResult> {
        match self.middleware.split_first() {
            Some((current, rest)) => current.process(
                ctx,
                req,
                Next {
                    middleware: rest,
                    handler: self.handler,
                },
            ),
            None => self.handler.call(ctx, req),
        }
    }
}

#[derive(Clone)]
pub struct Chain {
    middleware: Vec<Arc<dyn Middleware>>,
    handler: Arc<dyn Handler>,
}

impl Chain {
    pub fn new(handler: impl Handler) -> Self {
        Self {
            middleware: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    /// Appends `middleware`; the first layer added runs first.
    #[cfg(test)]
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Puts `outer` in front of the existing middleware.
    pub(crate) fn wrap(mut self, outer: &[Arc<dyn Middleware>]) -> Self {
        let mut middleware = outer.to_vec();
        middleware.append(&mut self.middleware);
        self.middleware = middleware;
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.middleware.iter().map(|m| m.name()).collect()
    }

    pub async fn run(&self, ctx: Context, req: Request) -> HandlerResult {
        Next {
            middleware: &self.middleware,
            handler: self.handler.as_ref(),
        }
        .run(ctx, req)
        .await
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("middleware", &self.names())
            .finish_non_exhaustive()
    }
}
