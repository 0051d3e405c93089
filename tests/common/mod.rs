//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use quickcreate_web::config::AppConfig;
use quickcreate_web::lifecycle::Shutdown;
use quickcreate_web::notes::{NoteService, NoteSession, SharedNoteSession};
use quickcreate_web::HttpServer;

pub const INDEX_HTML: &str = "<!doctype html><title>QuickCreate</title><main id=\"app\"></main>";
pub const MAIN_JS: &str = "console.log('quickcreate');";
pub const VALID_TOKEN: &str = "valid-token";

/// Note service that accepts `VALID_TOKEN` for any URL and names the user
/// "Ada" unless built with [`FakeNotes::named`].
#[derive(Default)]
pub struct FakeNotes {
    session: SharedNoteSession,
    name: Option<String>,
}

impl FakeNotes {
    pub fn named(name: &str) -> Self {
        Self {
            session: SharedNoteSession::new(),
            name: Some(name.to_string()),
        }
    }
}

impl NoteService for FakeNotes {
    fn exchange_credential(&self, token: Option<String>, url: Option<String>) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            match (token.as_deref(), url) {
                (Some(VALID_TOKEN), Some(_)) => self
                    .session
                    .set(NoteSession::authenticated(self.name.as_deref().unwrap_or("Ada"))),
                _ => self.session.reset(),
            }
        })
    }

    fn current_session(&self) -> NoteSession {
        self.session.get()
    }
}

/// A running site backed by a temporary web root.
pub struct TestSite {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    _web_root: TempDir,
}

impl TestSite {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestSite {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

fn write_web_root(dir: &Path) {
    std::fs::write(dir.join("index.html"), INDEX_HTML).unwrap();
    std::fs::create_dir_all(dir.join("scripts")).unwrap();
    std::fs::write(dir.join("scripts").join("main.js"), MAIN_JS).unwrap();
}

/// Start the site on an ephemeral port with the fake note service.
pub async fn start_site() -> TestSite {
    start_site_with(AppConfig::default(), Arc::new(FakeNotes::default())).await
}

/// Start the site with a custom configuration and note service.
/// The web root and bind address are always overridden.
pub async fn start_site_with(mut config: AppConfig, notes: Arc<dyn NoteService>) -> TestSite {
    let web_root = tempfile::tempdir().unwrap();
    write_web_root(web_root.path());

    config.site.web_root = web_root.path().to_string_lossy().into_owned();
    config.auth.cookie_secret = Some("k".repeat(64));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config, notes).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestSite {
        addr,
        shutdown,
        _web_root: web_root,
    }
}

/// Client that never follows redirects or uses a proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// `name=value` pair of the session cookie in a response, if one was set.
pub fn session_cookie(response: &reqwest::Response, cookie_name: &str) -> Option<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{cookie_name}=")))
        .map(str::to_string)
}

/// Start a programmable mock backend on an ephemeral port.
///
/// The handler receives the lowercased request head and answers with a
/// status code and a JSON body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut head = Vec::new();
                        let mut buf = [0u8; 1024];
                        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                            match socket.read(&mut buf).await {
                                Ok(0) | Err(_) => return,
                                Ok(n) => head.extend_from_slice(&buf[..n]),
                            }
                        }

                        let (status, body) = f(String::from_utf8_lossy(&head).to_lowercase()).await;
                        let status_text = match status {
                            200 => "200 OK",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
