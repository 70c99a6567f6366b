//! Fake REST backend and context helpers for the controller tests.
//!
//! The backend is an `axum` fallback handler on `127.0.0.1:0` that answers
//! canned JSON per `(method, path)` and records each request, including
//! parsed multipart fields.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::Value;

use casa_admin::{AdminConfig, AppContext, Notifier};
use casa_client::{ApiClient, ClientConfig, MemoryTokenStore, TokenStore};
use casa_core::validation::IdFormat;

/// One uploaded file in a multipart body.
#[derive(Debug, Clone)]
pub struct RecordedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// A request as seen by the fake backend.
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub json: Option<Value>,
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, RecordedFile>,
}

#[derive(Default)]
struct Inner {
    responses: HashMap<(String, String), (StatusCode, Value)>,
    requests: Vec<RecordedRequest>,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Mutex<Inner>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `status` and `body`.
    pub fn respond(&self, method: Method, path: &str, status: StatusCode, body: Value) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .responses
            .insert((method.to_string(), path.to_string()), (status, body));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request recorded")
    }

    /// Serve on an ephemeral port and return the base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new().fallback(handle).with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

async fn handle(State(backend): State<FakeBackend>, request: Request) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = request
        .uri()
        .query()
        .map(parse_query)
        .unwrap_or_default();
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    let mut recorded = RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query,
        authorization,
        ..Default::default()
    };

    if is_multipart {
        let mut multipart = Multipart::from_request(request, &()).await.unwrap();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or("").to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.unwrap();
            if file_name.is_some() {
                recorded.files.insert(
                    name,
                    RecordedFile {
                        file_name,
                        content_type,
                        bytes,
                    },
                );
            } else {
                recorded
                    .fields
                    .insert(name, String::from_utf8_lossy(&bytes).into_owned());
            }
        }
    } else {
        let bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .unwrap();
        recorded.json = serde_json::from_slice(&bytes).ok();
    }

    let mut inner = backend.inner.lock().unwrap();
    inner.requests.push(recorded);
    match inner.responses.get(&(method, path)) {
        Some((status, body)) => (*status, Json(body.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "statusCode": 404, "message": "Not Found" })),
        )
            .into_response(),
    }
}

fn parse_query(raw: &str) -> HashMap<String, String> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(k), decode(v))
        })
        .collect()
}

fn decode(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(b) = u8::from_str_radix(&raw[i + 1..i + 3], 16) {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// A client pointed at `base_url`, with an optional stored token.
pub fn client(base_url: &str, token: Option<&str>) -> (ApiClient, Arc<MemoryTokenStore>) {
    let store = Arc::new(match token {
        Some(t) => MemoryTokenStore::with_token(t),
        None => MemoryTokenStore::new(),
    });
    let tokens: Arc<dyn TokenStore> = store.clone();
    let client = ApiClient::new(&ClientConfig::new(base_url), tokens).unwrap();
    (client, store)
}

/// An application context on `base_url` that accepts opaque ids.
pub fn context(base_url: &str, token: Option<&str>) -> (AppContext, Arc<MemoryTokenStore>) {
    let (client, store) = client(base_url, token);
    let config = AdminConfig {
        api_url: base_url.to_string(),
        id_format: IdFormat::Opaque,
        ..AdminConfig::default()
    };
    (AppContext::new(config, client, Notifier::default()), store)
}
