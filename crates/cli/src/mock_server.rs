// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local axum servers standing in for the OAuth and REST endpoints.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, MethodRouter};
use axum::Router;
use tokio::net::TcpListener;

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl Recorded {
    /// Value of one `application/x-www-form-urlencoded` field.
    pub fn form(&self, key: &str) -> Option<String> {
        self.body.split('&').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            (k == key).then(|| v.replace("%40", "@").replace('+', " "))
        })
    }
}

type Log = Arc<Mutex<Vec<Recorded>>>;

pub struct MockServer {
    pub addr: SocketAddr,
    log: Log,
}

impl MockServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self, path: &str) -> Vec<Recorded> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }
}

#[derive(Default)]
pub struct MockServerBuilder {
    router: Router,
    log: Log,
}

impl MockServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `POST /token` answering with `responses` in order, repeating the last.
    pub fn token(self, responses: Vec<(u16, serde_json::Value)>) -> Self {
        let script = Script::new("/token", responses, &self.log);
        self.route("/token", post(move |h: HeaderMap, b: String| script.clone().respond(h, b)))
    }

    pub fn get(self, path: &str, responses: Vec<(u16, serde_json::Value)>) -> Self {
        let script = Script::new(path, responses, &self.log);
        self.route(path, get(move |h: HeaderMap, b: String| script.clone().respond(h, b)))
    }

    fn route(mut self, path: &str, route: MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    pub async fn start(self) -> MockServer {
        let addr = serve(self.router).await;
        MockServer { addr, log: self.log }
    }
}

#[derive(Clone)]
struct Script {
    path: String,
    responses: Arc<Vec<(u16, serde_json::Value)>>,
    calls: Arc<AtomicUsize>,
    log: Log,
}

impl Script {
    fn new(path: &str, responses: Vec<(u16, serde_json::Value)>, log: &Log) -> Self {
        Self {
            path: path.to_owned(),
            responses: Arc::new(responses),
            calls: Arc::new(AtomicUsize::new(0)),
            log: Arc::clone(log),
        }
    }

    async fn respond(self, headers: HeaderMap, body: String) -> Response {
        let authorization =
            headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()).map(str::to_owned);
        self.log.lock().unwrap_or_else(PoisonError::into_inner).push(Recorded {
            path: self.path,
            authorization,
            body,
        });
        let idx = self.calls.fetch_add(1, Ordering::Relaxed);
        let (status, value) = self
            .responses
            .get(idx)
            .or_else(|| self.responses.last())
            .cloned()
            .unwrap_or((500, serde_json::json!({})));
        (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            [(CONTENT_TYPE, "application/json")],
            value.to_string(),
        )
            .into_response()
    }
}

/// Serve `app` on an ephemeral localhost port.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

/// A successful client-credentials token body.
pub fn token_body(access: &str) -> serde_json::Value {
    serde_json::json!({
        "access_token": access,
        "token_type": "Bearer",
        "expires_in": 7200,
    })
}
