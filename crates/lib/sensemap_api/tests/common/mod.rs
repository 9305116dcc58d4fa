//! Test harness — a mock upstream (an axum app on an ephemeral port that
//! answers with canned responses and records every request it sees) plus a
//! router wired to it.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use sensemap_api::{AppState, config::ApiConfig};
use sensemap_core::{ProxyConfig, SenseMapProxy};
use tower::ServiceExt;

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

struct Canned {
    method: Method,
    path: String,
    status: StatusCode,
    body: String,
}

struct MockState {
    canned: Vec<Canned>,
    recorded: Mutex<Vec<Recorded>>,
}

pub struct MockUpstream {
    pub base_url: String,
    state: Arc<MockState>,
}

#[derive(Default)]
pub struct MockBuilder {
    canned: Vec<Canned>,
}

impl MockBuilder {
    pub fn respond(mut self, method: Method, path: &str, status: u16, body: &str) -> Self {
        self.canned.push(Canned {
            method,
            path: path.to_string(),
            status: StatusCode::from_u16(status).expect("valid status"),
            body: body.to_string(),
        });
        self
    }

    pub async fn start(self) -> MockUpstream {
        let state = Arc::new(MockState {
            canned: self.canned,
            recorded: Mutex::default(),
        });

        let app = Router::new().fallback(answer).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock upstream");
        let addr = listener.local_addr().expect("mock upstream addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock upstream");
        });

        MockUpstream {
            base_url: format!("http://{addr}"),
            state,
        }
    }
}

impl MockUpstream {
    pub fn builder() -> MockBuilder {
        MockBuilder::default()
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.state.recorded.lock().expect("recorded lock").clone()
    }
}

async fn answer(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    state.recorded.lock().expect("recorded lock").push(Recorded {
        method: method.clone(),
        path: path.clone(),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    match state
        .canned
        .iter()
        .find(|c| c.method == method && c.path == path)
    {
        Some(c) => (c.status, c.body.clone()).into_response(),
        None => (StatusCode::IM_A_TEAPOT, format!("no mock for {method} {path}")).into_response(),
    }
}

/// Address of a port nothing is listening on.
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind unused port");
    let addr = listener.local_addr().expect("unused port addr");
    drop(listener);
    format!("http://{addr}")
}

/// Router proxying to `base_url`.
pub fn app_for(base_url: &str) -> Router {
    let upstream = ProxyConfig::new(base_url).expect("valid base url");
    let state = AppState {
        proxy: SenseMapProxy::new(reqwest::Client::new(), upstream.clone()),
        config: ApiConfig {
            bind_addr: "127.0.0.1:0".into(),
            upstream,
        },
    };
    sensemap_api::router(state)
}

/// Sends one request through the router; returns status and body text.
pub async fn call(
    app: Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    json: Option<serde_json::Value>,
) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    let body = match json {
        Some(value) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let resp = app
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("response");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}
