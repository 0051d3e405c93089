//! Fault rendering.
//!
//! Handler failures surface here as a `HandlerFault` response extension;
//! panics arrive through `CatchPanicLayer`. Development renders a
//! diagnostic page, production a generic failure.

use std::any::Any;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::Environment;
use crate::http::request::RequestIdExt;
use crate::http::response::{escape_html, html, text};
use crate::routing::HandlerError;

/// A route handler failed; carried on the 500 response it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFault {
    pub route: String,
    pub message: String,
}

impl HandlerFault {
    pub fn new(route: impl Into<String>, error: &HandlerError) -> Self {
        Self {
            route: route.into(),
            message: error.to_string(),
        }
    }
}

impl IntoResponse for HandlerFault {
    fn into_response(self) -> Response {
        let mut response = text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        response.extensions_mut().insert(self);
        response
    }
}

pub async fn diagnostics_stage(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let request_id = request.request_id().to_string();

    let response = next.run(request).await;

    let Some(fault) = response.extensions().get::<HandlerFault>().cloned() else {
        return response;
    };

    if environment.is_development() {
        let detail = format!(
            "<dl><dt>Route</dt><dd>{}</dd><dt>Request</dt><dd>{} {}</dd><dt>Request ID</dt><dd>{}</dd></dl>",
            escape_html(&fault.route),
            escape_html(&method),
            escape_html(&path),
            escape_html(&request_id),
        );
        error_page(&fault.message, &detail)
    } else {
        generic_failure()
    }
}

/// Response for a caught panic.
pub fn panic_response(environment: Environment, panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %message, "Request handler panicked");

    if environment.is_development() {
        error_page(&message, "<p>The request handler panicked.</p>")
    } else {
        generic_failure()
    }
}

fn error_page(message: &str, detail: &str) -> Response {
    html(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!(
            "<!DOCTYPE html><html><head><title>Internal Server Error</title></head>\
             <body><h1>An unhandled exception occurred while processing the request.</h1>\
             <h2>{}</h2>{}</body></html>",
            escape_html(message),
            detail,
        ),
    )
}

fn generic_failure() -> Response {
    text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_panic_page_in_development() {
        let response = panic_response(Environment::Development, Box::new("kaboom <b>"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert!(body.contains("kaboom &lt;b&gt;"));
    }

    #[tokio::test]
    async fn test_panic_generic_in_production() {
        let response = panic_response(Environment::Production, Box::new(String::from("secret detail")));
        let body = body_text(response).await;
        assert_eq!(body, "Internal Server Error");
    }

    #[test]
    fn test_fault_response_carries_extension() {
        let fault = HandlerFault::new("note", &HandlerError::internal("bad"));
        let response = fault.clone().into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.extensions().get::<HandlerFault>(), Some(&fault));
    }
}
