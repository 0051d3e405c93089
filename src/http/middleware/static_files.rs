//! Default document and static file stages.
//!
//! # Responsibilities
//! - Rewrite directory requests (`/`, `/docs/`) to the default document
//!   when that file exists
//! - Serve GET/HEAD requests from the web root
//! - Fall through to the next stage on a miss
//!
//! # Design Decisions
//! - Only GET and HEAD are probed; other methods pass straight through
//! - The request body is kept aside while probing so a miss forwards the
//!   original request intact
//! - Paths containing `..` are never rewritten

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{Method, StatusCode, Uri},
    middleware::Next,
    response::Response,
};
use tower::ServiceExt;
use tower_http::services::ServeDir;

/// Static site served by the pipeline.
#[derive(Debug, Clone)]
pub struct StaticSite {
    root: PathBuf,
    default_document: String,
    serve_dir: ServeDir,
}

impl StaticSite {
    pub fn new(root: impl Into<PathBuf>, default_document: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            serve_dir: ServeDir::new(&root).append_index_html_on_directories(false),
            root,
            default_document: default_document.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the default document for a directory request, if it exists.
    async fn default_document_for(&self, dir_path: &str) -> Option<String> {
        let relative = dir_path.trim_start_matches('/');
        if relative.split('/').any(|segment| segment == "..") {
            return None;
        }

        let candidate = self.root.join(relative).join(&self.default_document);
        match tokio::fs::metadata(&candidate).await {
            Ok(meta) if meta.is_file() => Some(format!("{dir_path}{}", self.default_document)),
            _ => None,
        }
    }
}

fn is_read(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

fn with_path(uri: &Uri, path: &str) -> Option<Uri> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse().ok()?);
    Uri::from_parts(parts).ok()
}

pub async fn default_document_stage(
    State(site): State<Arc<StaticSite>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if is_read(request.method()) && path.ends_with('/') {
        if let Some(document) = site.default_document_for(&path).await {
            if let Some(uri) = with_path(request.uri(), &document) {
                tracing::trace!(from = %path, to = %document, "Default document rewrite");
                *request.uri_mut() = uri;
            }
        }
    }

    next.run(request).await
}

pub async fn static_files_stage(
    State(site): State<Arc<StaticSite>>,
    request: Request,
    next: Next,
) -> Response {
    if !is_read(request.method()) {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let probe = Request::from_parts(parts.clone(), Body::empty());

    let response = match site.serve_dir.clone().oneshot(probe).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    if response.status() == StatusCode::NOT_FOUND {
        return next.run(Request::from_parts(parts, body)).await;
    }

    response.map(Body::new)
}
