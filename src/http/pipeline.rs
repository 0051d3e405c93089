//! Request pipeline composition.
//!
//! # Stage Order
//! ```text
//! request id / tracing / panic capture        (ambient)
//!   1. diagnostics      render handler faults
//!      timeout, cookie manager                 (ambient)
//!   2. default document `/` → `/index.html`
//!   3. static files     serve or fall through
//!   4. cookie auth      attach Identity, optional challenge
//!   5. route table      dispatch on match, else continue
//!   6. auth gate        401 for anonymous requests
//!   7. mounts           path-prefixed sub-applications
//!      fallback         404
//! ```
//!
//! # Design Decisions
//! - Order is fixed; callers choose stage inputs, never the order
//! - Stages are independent `from_fn` functions, testable in isolation
//! - The route engine is taken as a trait object

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, middleware, Router};
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Environment;
use crate::http::middleware::{
    auth_gate_stage, cookie_auth_stage, default_document_stage, diagnostics_stage, panic_response,
    route_stage, static_files_stage, CookieAuth, StaticSite,
};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::response::not_found;
use crate::routing::RouteEngine;

/// Builder for the application's request pipeline.
pub struct Pipeline {
    environment: Environment,
    site: Arc<StaticSite>,
    auth: Arc<CookieAuth>,
    engine: Arc<dyn RouteEngine>,
    mounts: Vec<(String, Router)>,
    request_timeout: Duration,
}

impl Pipeline {
    pub fn new(
        environment: Environment,
        site: StaticSite,
        auth: CookieAuth,
        engine: Arc<dyn RouteEngine>,
    ) -> Self {
        Self {
            environment,
            site: Arc::new(site),
            auth: Arc::new(auth),
            engine,
            mounts: Vec::new(),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Mount a sub-application behind the authentication gate.
    /// A prefix of `/` makes it the catch-all.
    pub fn mount(mut self, prefix: &str, app: Router) -> Self {
        let prefix = format!("/{}", prefix.trim_matches('/'));
        self.mounts.push((prefix, app));
        self
    }

    /// Compose every stage into a single router.
    pub fn build(self) -> Router {
        let environment = self.environment;

        let mut app = Router::new();
        let mut root_mount = None;
        for (prefix, sub_app) in self.mounts {
            if prefix == "/" {
                root_mount = Some(sub_app);
            } else {
                tracing::debug!(prefix = %prefix, "Mounting sub-application");
                app = app.nest_service(&prefix, sub_app);
            }
        }
        let app = match root_mount {
            Some(sub_app) => app.fallback_service(sub_app),
            None => app.fallback(not_found),
        };

        app.layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer())
                .layer(CatchPanicLayer::custom(
                    move |panic: Box<dyn Any + Send + 'static>| panic_response(environment, panic),
                ))
                .layer(middleware::from_fn_with_state(environment, diagnostics_stage))
                .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, self.request_timeout))
                .layer(CookieManagerLayer::new())
                .layer(middleware::from_fn_with_state(self.site.clone(), default_document_stage))
                .layer(middleware::from_fn_with_state(self.site, static_files_stage))
                .layer(middleware::from_fn_with_state(self.auth, cookie_auth_stage))
                .layer(middleware::from_fn_with_state(self.engine, route_stage))
                .layer(middleware::from_fn(auth_gate_stage)),
        )
    }
}
