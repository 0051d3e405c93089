//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Register the application's routes
//! - Assemble the request pipeline around them
//! - Bind server to listener
//! - Stop on Ctrl+C or an internal shutdown signal

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::AppConfig;
use crate::http::handlers;
use crate::http::middleware::{CookieAuth, StaticSite};
use crate::http::pipeline::Pipeline;
use crate::lifecycle::wait_for_shutdown;
use crate::notes::NoteService;
use crate::routing::{
    handler_fn, HttpMethodConstraint, RouteError, RouteOptions, RouteTable, RouteTableBuilder,
};
use crate::signin::SigninHandshake;

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("route registration failed: {0}")]
    Route(#[from] RouteError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Register the application's routes, in priority order.
pub fn build_routes(handshake: Arc<SigninHandshake>) -> Result<RouteTable, RouteError> {
    let mut routes = RouteTableBuilder::new();
    routes
        .register(
            "signin",
            "signing",
            RouteOptions::new().constraint("httpMethod", HttpMethodConstraint::only("POST")),
            handshake.into_handler(),
        )?
        .register(
            "userNote",
            "api/user/{userId}/note/{noteId}",
            RouteOptions::new(),
            handler_fn(handlers::user_note),
        )?;
    Ok(routes.build())
}

/// HTTP server for the single-page site.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig, notes: Arc<dyn NoteService>) -> Result<Self, ServerError> {
        let auth = CookieAuth::from_config(&config.auth);
        let handshake = Arc::new(SigninHandshake::new(
            notes,
            Arc::new(auth.clone()),
            config.security.max_body_size,
        ));
        let routes = build_routes(handshake)?;

        tracing::info!(routes = routes.len(), "Route table built");

        let router = Pipeline::new(
            config.site.environment,
            StaticSite::new(&config.site.web_root, &config.site.default_document),
            auth,
            Arc::new(routes),
        )
        .request_timeout(Duration::from_secs(config.timeouts.request_secs))
        .mount("/foo", handlers::protected_app())
        .build();

        Ok(Self { router, config })
    }

    /// The composed router, e.g. for driving it without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the server until Ctrl+C or `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            environment = ?self.config.site.environment,
            web_root = %self.config.site.web_root,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
