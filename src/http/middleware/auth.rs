//! Cookie authentication and the authentication gate.
//!
//! # Responsibilities
//! - Read and verify the signed session cookie
//! - Attach the authenticated `Identity` to the request
//! - Optionally turn 401s for anonymous requests into a login redirect
//! - Reject anonymous requests before protected sub-applications
//!
//! # Design Decisions
//! - The cookie stage never rejects on its own
//! - The gate is terminal: no redirect, no retry
//! - The cookie value is the percent-encoded display name; the signature
//!   is the proof

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use tower_cookies::cookie::{time::Duration, SameSite};
use tower_cookies::{Cookie, Cookies, Key};

use crate::config::{AuthConfig, MAX_COOKIE_MAX_AGE_DAYS};
use crate::http::response::text;
use crate::observability::metrics;

/// Body returned by the gate to anonymous requests.
pub const UNAUTHENTICATED_BODY: &str = "You need to be authenticated";

/// Authenticated identity attached to the request by the cookie stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
}

/// Session cookie settings and signing key.
#[derive(Clone)]
pub struct CookieAuth {
    key: Key,
    cookie_name: String,
    max_age: Duration,
    login_path: String,
    challenge: bool,
}

impl CookieAuth {
    pub fn from_config(config: &AuthConfig) -> Self {
        let key = match &config.cookie_secret {
            Some(secret) => Key::try_from(secret.as_bytes()).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Cookie secret unusable, generating a random key");
                Key::generate()
            }),
            None => {
                tracing::info!("No cookie secret configured, sessions will not survive a restart");
                Key::generate()
            }
        };

        Self {
            key,
            cookie_name: config.cookie_name.clone(),
            max_age: Duration::days(config.cookie_max_age_days.clamp(1, MAX_COOKIE_MAX_AGE_DAYS)),
            login_path: config.login_path.clone(),
            challenge: config.challenge,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Verified identity carried by the request's cookies, if any.
    pub fn identity(&self, cookies: &Cookies) -> Option<Identity> {
        cookies
            .signed(&self.key)
            .get(&self.cookie_name)
            .and_then(|c| {
                percent_decode_str(c.value())
                    .decode_utf8()
                    .ok()
                    .map(|name| name.into_owned())
            })
            .filter(|name| !name.is_empty())
            .map(|name| Identity { name })
    }

    /// Add a persistent signed session cookie naming `display_name`.
    pub fn issue(&self, cookies: &Cookies, display_name: &str) {
        let value = utf8_percent_encode(display_name, NON_ALPHANUMERIC).to_string();
        let cookie = Cookie::build((self.cookie_name.clone(), value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(self.max_age)
            .build();
        cookies.signed(&self.key).add(cookie);
    }

    /// Remove the session cookie.
    pub fn revoke(&self, cookies: &Cookies) {
        cookies.signed(&self.key).remove(Cookie::build(self.cookie_name.clone()).path("/").build());
    }
}

pub async fn cookie_auth_stage(
    State(auth): State<Arc<CookieAuth>>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Response {
    let anonymous = match auth.identity(&cookies) {
        Some(identity) => {
            tracing::trace!(user = %identity.name, "Session cookie accepted");
            request.extensions_mut().insert(identity);
            false
        }
        None => true,
    };

    let response = next.run(request).await;
    if anonymous && auth.challenge && response.status() == StatusCode::UNAUTHORIZED {
        tracing::debug!(login_path = %auth.login_path, "Challenging anonymous request");
        return Redirect::to(&auth.login_path).into_response();
    }
    response
}

pub async fn auth_gate_stage(request: Request, next: Next) -> Response {
    if request.extensions().get::<Identity>().is_some() {
        return next.run(request).await;
    }

    tracing::debug!(path = %request.uri().path(), "Rejecting unauthenticated request");
    metrics::record_gate_rejection();
    text(StatusCode::UNAUTHORIZED, UNAUTHENTICATED_BODY)
}
