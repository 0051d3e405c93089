//! HTTP client for the remote note service.
//!
//! # Responsibilities
//! - Validate the service URL supplied at sign-in
//! - Present the token as a bearer credential
//! - Read the user's display name from the JSON answer
//! - Record the outcome in the shared session
//!
//! # Design Decisions
//! - Uses the caller-supplied URL as the user endpoint; the full token
//!   protocol of the note service is out of scope
//! - Failures are logged at warn and leave the session anonymous
//! - The URL comes from the anonymous caller, so the bearer token is only
//!   sent to hosts in `allowed_hosts` when that list is configured

use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;

use crate::config::NoteServiceConfig;
use crate::notes::session::{NoteSession, SharedNoteSession};
use crate::notes::{NoteService, NoteServiceError};

/// User document returned by the note service.
#[derive(Debug, Deserialize)]
struct NoteUser {
    name: Option<String>,
    username: Option<String>,
}

impl NoteUser {
    fn display_name(self) -> Option<String> {
        self.name
            .filter(|n| !n.trim().is_empty())
            .or(self.username.filter(|n| !n.trim().is_empty()))
    }
}

/// Note service reached over HTTP.
#[derive(Clone)]
pub struct HttpNoteService {
    client: Client,
    session: SharedNoteSession,
    allowed_hosts: Vec<String>,
}

impl HttpNoteService {
    /// Create a client with the configured timeout and a fresh session.
    pub fn new(config: &NoteServiceConfig) -> Result<Self, NoteServiceError> {
        Self::with_session(config, SharedNoteSession::new())
    }

    /// Create a client that records into an existing session slot.
    pub fn with_session(
        config: &NoteServiceConfig,
        session: SharedNoteSession,
    ) -> Result<Self, NoteServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("quickcreate-web/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            session,
            allowed_hosts: config
                .allowed_hosts
                .iter()
                .map(|h| h.to_ascii_lowercase())
                .collect(),
        })
    }

    pub fn session(&self) -> &SharedNoteSession {
        &self.session
    }

    /// Perform the exchange and return the established display name.
    pub async fn fetch_display_name(
        &self,
        token: Option<&str>,
        url: Option<&str>,
    ) -> Result<String, NoteServiceError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(NoteServiceError::MissingCredential("token"))?;
        let raw_url = url
            .filter(|u| !u.is_empty())
            .ok_or(NoteServiceError::MissingCredential("url"))?;

        let endpoint = parse_service_url(raw_url)?;
        self.check_host(&endpoint)?;

        let response = self
            .client
            .get(endpoint)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NoteServiceError::Rejected(status.as_u16()));
        }

        let user: NoteUser = response.json().await?;
        user.display_name().ok_or(NoteServiceError::MissingName)
    }
}

impl HttpNoteService {
    fn check_host(&self, url: &url::Url) -> Result<(), NoteServiceError> {
        if self.allowed_hosts.is_empty() {
            return Ok(());
        }

        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
        if self.allowed_hosts.iter().any(|allowed| *allowed == host) {
            Ok(())
        } else {
            Err(NoteServiceError::HostNotAllowed(host))
        }
    }
}

fn parse_service_url(raw: &str) -> Result<url::Url, NoteServiceError> {
    let invalid = |reason: String| NoteServiceError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let url = url::Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

impl NoteService for HttpNoteService {
    fn exchange_credential(&self, token: Option<String>, url: Option<String>) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            match self.fetch_display_name(token.as_deref(), url.as_deref()).await {
                Ok(name) => {
                    tracing::info!(user = %name, "Note service session established");
                    self.session.set(NoteSession::authenticated(name));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Note service exchange failed");
                    self.session.reset();
                }
            }
        })
    }

    fn current_session(&self) -> NoteSession {
        self.session.get()
    }
}
