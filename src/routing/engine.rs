//! Seam between the pipeline and whatever performs route matching.
//!
//! The pipeline only needs two capabilities: try to claim a request, and
//! finish a claimed request. `RouteTable` is the built-in engine; another
//! matcher can be swapped in without touching pipeline composition.

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;

use super::dispatch::{HandlerError, MatchContext};

pub trait RouteEngine: Send + Sync {
    /// Claim the request, or hand it back untouched on a miss.
    fn match_request(&self, req: Request<Body>) -> Result<MatchContext, Request<Body>>;

    /// Run the handler bound to the claimed route.
    fn invoke(&self, ctx: MatchContext) -> BoxFuture<'static, Result<Response, HandlerError>>;
}
