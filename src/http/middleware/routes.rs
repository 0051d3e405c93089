//! Route table stage.
//!
//! A match is dispatched and ends the chain; a miss continues with the
//! original request. Handler failures become a 500 carrying a
//! `HandlerFault` for the diagnostics stage to render.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::middleware::diagnostics::HandlerFault;
use crate::http::request::RequestIdExt;
use crate::observability::metrics;
use crate::routing::RouteEngine;

pub async fn route_stage(
    State(engine): State<Arc<dyn RouteEngine>>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = request.request_id().to_string();

    let ctx = match engine.match_request(request) {
        Ok(ctx) => ctx,
        Err(request) => return next.run(request).await,
    };

    let route = ctx.route().to_string();
    tracing::debug!(
        request_id = %request_id,
        route = %route,
        path = %ctx.request().uri().path(),
        "Route matched"
    );
    metrics::record_dispatch(&route);

    match engine.invoke(ctx).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(request_id = %request_id, route = %route, error = %e, "Route handler failed");
            HandlerFault::new(route, &e).into_response()
        }
    }
}
