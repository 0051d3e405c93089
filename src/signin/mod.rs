//! Sign-in handshake.
//!
//! # Data Flow
//! ```text
//! POST /signing (form: token, url)
//!     → form.rs (parse body; unreadable or empty body = empty form)
//!     → NoteService::exchange_credential(token, url)
//!     → NoteService::current_session()
//!     → authenticated? issue signed session cookie
//!     → JSON {"success": bool, "name": string|null}
//! ```
//!
//! # Design Decisions
//! - Authentication failure is reported in the body, never as an HTTP error
//! - Exchange and session read are serialized so a sign-in reports the
//!   session its own exchange produced

pub mod form;

use std::sync::Arc;

use axum::body::Bytes;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_cookies::Cookies;

use crate::http::middleware::CookieAuth;
use crate::notes::NoteService;
use crate::observability::metrics;
use crate::routing::{handler_fn, HandlerError, MatchContext, RouteHandler};

pub use form::SigninForm;

/// JSON answer of the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigninOutcome {
    pub success: bool,
    pub name: Option<String>,
}

/// Exchanges posted credentials for a note service session.
pub struct SigninHandshake {
    notes: Arc<dyn NoteService>,
    auth: Arc<CookieAuth>,
    max_body_size: usize,
    exchange: Mutex<()>,
}

impl SigninHandshake {
    pub fn new(notes: Arc<dyn NoteService>, auth: Arc<CookieAuth>, max_body_size: usize) -> Self {
        Self {
            notes,
            auth,
            max_body_size,
            exchange: Mutex::new(()),
        }
    }

    /// Run the exchange for a raw form body and report the session state.
    pub async fn signin(&self, raw_form: &[u8]) -> SigninOutcome {
        let form = SigninForm::parse(raw_form);

        let session = {
            let _guard = self.exchange.lock().await;
            self.notes.exchange_credential(form.token, form.url).await;
            self.notes.current_session()
        };

        SigninOutcome {
            success: session.is_authenticated,
            name: session.display_name,
        }
    }

    /// Route target for the sign-in endpoint.
    pub async fn handle(&self, ctx: MatchContext) -> Result<Response, HandlerError> {
        let request = ctx.into_request();
        let cookies = request.extensions().get::<Cookies>().cloned();

        let body = match axum::body::to_bytes(request.into_body(), self.max_body_size).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "Sign-in body unreadable, treating form as empty");
                Bytes::new()
            }
        };

        let outcome = self.signin(&body).await;
        metrics::record_signin(outcome.success);

        if outcome.success {
            let cookies = cookies.ok_or_else(|| HandlerError::internal("cookie manager is not installed"))?;
            let name = outcome.name.as_deref().unwrap_or_default();
            self.auth.issue(&cookies, name);
            tracing::info!(user = %name, "Signed in");
        } else {
            tracing::info!("Sign-in rejected by note service");
        }

        Ok(Json(outcome).into_response())
    }

    /// Wrap the handshake as a delegating route handler.
    pub fn into_handler(self: Arc<Self>) -> Arc<dyn RouteHandler> {
        handler_fn(move |ctx: MatchContext| {
            let handshake = Arc::clone(&self);
            async move { handshake.handle(ctx).await }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::notes::{NoteSession, SharedNoteSession};
    use futures_util::future::BoxFuture;

    /// Accepts token "abc" for any URL.
    struct StubNotes {
        session: SharedNoteSession,
    }

    impl NoteService for StubNotes {
        fn exchange_credential(&self, token: Option<String>, url: Option<String>) -> BoxFuture<'_, ()> {
            Box::pin(async move {
                match (token.as_deref(), url) {
                    (Some("abc"), Some(_)) => self.session.set(NoteSession::authenticated("Ada")),
                    _ => self.session.reset(),
                }
            })
        }

        fn current_session(&self) -> NoteSession {
            self.session.get()
        }
    }

    fn handshake() -> SigninHandshake {
        SigninHandshake::new(
            Arc::new(StubNotes {
                session: SharedNoteSession::new(),
            }),
            Arc::new(CookieAuth::from_config(&AuthConfig::default())),
            1024,
        )
    }

    #[tokio::test]
    async fn test_successful_exchange() {
        let outcome = handshake().signin(b"token=abc&url=https://x").await;
        assert_eq!(
            outcome,
            SigninOutcome {
                success: true,
                name: Some("Ada".into()),
            }
        );
    }

    #[tokio::test]
    async fn test_empty_body_fails_exchange() {
        let outcome = handshake().signin(b"").await;
        assert_eq!(
            outcome,
            SigninOutcome {
                success: false,
                name: None,
            }
        );
    }

    #[test]
    fn test_outcome_json_shape() {
        let json = serde_json::to_value(SigninOutcome {
            success: false,
            name: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "name": null}));
    }
}
