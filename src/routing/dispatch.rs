//! Delegating dispatch of matched requests.
//!
//! # Responsibilities
//! - Carry per-request match state to the bound handler
//! - Adapt a plain async function into a route target
//! - Mark the response as handled once the function completes
//!
//! # Design Decisions
//! - `MatchContext` is moved into the handler, so one request can only be
//!   claimed by one route
//! - Handler failures propagate unchanged; recovery belongs to the pipeline
//! - Reverse lookup (URL generation) is not supported by delegating handlers

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;
use thiserror::Error;

use super::template::RouteValues;

/// Per-request state produced when a route matches.
#[derive(Debug)]
pub struct MatchContext {
    route: Arc<str>,
    values: RouteValues,
    data_tokens: Arc<BTreeMap<String, String>>,
    request: Request<Body>,
}

impl MatchContext {
    pub fn new(
        route: Arc<str>,
        values: RouteValues,
        data_tokens: Arc<BTreeMap<String, String>>,
        request: Request<Body>,
    ) -> Self {
        Self {
            route,
            values,
            data_tokens,
            request,
        }
    }

    /// Name of the route that claimed the request.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Extracted placeholder values, plus defaults.
    pub fn values(&self) -> &RouteValues {
        &self.values
    }

    /// Shorthand for `values().get(name)`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name)
    }

    /// Opaque metadata registered with the route.
    pub fn data_tokens(&self) -> &BTreeMap<String, String> {
        &self.data_tokens
    }

    pub fn request(&self) -> &Request<Body> {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request<Body> {
        &mut self.request
    }

    /// Take ownership of the request, e.g. to read its body.
    pub fn into_request(self) -> Request<Body> {
        self.request
    }
}

/// Failure raised inside a route handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The request body could not be read.
    #[error("failed to read request body: {0}")]
    Body(String),

    /// A collaborator failed.
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// Any other handler fault.
    #[error("{0}")]
    Internal(String),
}

impl HandlerError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Response extension recording which route handled the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handled {
    pub route: String,
}

/// A route target: something that can finish a matched request.
pub trait RouteHandler: Send + Sync {
    /// Run the handler for a matched request.
    fn call(&self, ctx: MatchContext) -> BoxFuture<'static, Result<Response, HandlerError>>;

    /// Generate a URL for this route. Delegating handlers cannot.
    fn virtual_path(&self, _values: &RouteValues) -> Option<String> {
        None
    }
}

/// Wraps a plain `async fn(MatchContext)` as a route target.
pub struct DelegatingHandler<F> {
    f: F,
}

impl<F> DelegatingHandler<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, Fut> RouteHandler for DelegatingHandler<F>
where
    F: Fn(MatchContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response, HandlerError>> + Send + 'static,
{
    fn call(&self, ctx: MatchContext) -> BoxFuture<'static, Result<Response, HandlerError>> {
        let route = ctx.route().to_string();
        let fut = (self.f)(ctx);

        Box::pin(async move {
            let mut response = fut.await?;
            response.extensions_mut().insert(Handled { route });
            Ok(response)
        })
    }
}

/// Convert an async function into a shareable route handler.
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn RouteHandler>
where
    F: Fn(MatchContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, HandlerError>> + Send + 'static,
{
    Arc::new(DelegatingHandler::new(f))
}
