//! Common test utilities - in-process mock of the Together AI API.

#![allow(dead_code)]

use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use genchat::TogetherClient;
use image::{DynamicImage, Rgb, RgbImage};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

/// Canned behaviour of the mock endpoints.
#[derive(Clone)]
pub struct MockConfig {
    /// Status returned by `/v1/chat/completions`.
    pub chat_status: StatusCode,
    /// Body returned by `/v1/chat/completions`.
    pub chat_body: Value,
    /// Answer `/v1/chat/completions` with 200 and a body that is not JSON.
    pub chat_malformed: bool,
    /// File name the image endpoint points its URL at.
    pub image_file: String,
    /// Width and height of the PNG served at `/files/cat.png`.
    pub served_size: (u32, u32),
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            chat_status: StatusCode::OK,
            chat_body: completion("B.E.C.R.E.A.T.I.V.E Rain on the roof, a towel within reach."),
            chat_malformed: false,
            image_file: "cat.png".to_string(),
            served_size: (1024, 768),
        }
    }
}

/// Builds a chat completion body with a single choice.
pub fn completion(content: &str) -> Value {
    json!({
        "id": "cmpl-test",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}}
        ]
    })
}

struct MockState {
    config: MockConfig,
    base_url: String,
    png: Vec<u8>,
    chat_requests: Mutex<Vec<Value>>,
    image_requests: Mutex<Vec<Value>>,
    auth_headers: Mutex<Vec<String>>,
}

/// Mock Together AI server bound to a random local port.
pub struct MockTogether {
    pub addr: SocketAddr,
    state: Arc<MockState>,
    _handle: JoinHandle<()>,
}

impl MockTogether {
    /// Starts a mock server with the given behaviour.
    pub async fn start(config: MockConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (width, height) = config.served_size;
        let state = Arc::new(MockState {
            config,
            base_url: format!("http://{addr}"),
            png: png_bytes(width, height),
            chat_requests: Mutex::new(Vec::new()),
            image_requests: Mutex::new(Vec::new()),
            auth_headers: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .route("/v1/images/generations", post(image_generations))
            .route("/files/{name}", get(serve_file))
            .with_state(state.clone());

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock server error: {}", e);
            }
        });

        Self {
            addr,
            state,
            _handle: handle,
        }
    }

    /// API base URL clients should use.
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// A client pointed at this server.
    pub fn client(&self) -> TogetherClient {
        TogetherClient::builder()
            .api_key("test-key")
            .base_url(self.base_url())
            .build()
            .unwrap()
    }

    pub fn chat_requests(&self) -> Vec<Value> {
        self.state.chat_requests.lock().unwrap().clone()
    }

    pub fn image_requests(&self) -> Vec<Value> {
        self.state.image_requests.lock().unwrap().clone()
    }

    pub fn auth_headers(&self) -> Vec<String> {
        self.state.auth_headers.lock().unwrap().clone()
    }
}

fn record_auth(state: &MockState, headers: &HeaderMap) {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        state
            .auth_headers
            .lock()
            .unwrap()
            .push(value.to_str().unwrap_or_default().to_string());
    }
}

async fn chat_completions(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record_auth(&state, &headers);
    state.chat_requests.lock().unwrap().push(body);
    if state.config.chat_malformed {
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            "<html><body>gateway hiccup</body></html>",
        )
            .into_response();
    }
    (state.config.chat_status, Json(state.config.chat_body.clone())).into_response()
}

async fn image_generations(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    record_auth(&state, &headers);
    state.image_requests.lock().unwrap().push(body);
    Json(json!({
        "id": "img-test",
        "model": "black-forest-labs/FLUX.1-schnell-Free",
        "data": [
            {"index": 0, "url": format!("{}/files/{}", state.base_url, state.config.image_file)}
        ]
    }))
}

async fn serve_file(State(state): State<Arc<MockState>>, Path(name): Path<String>) -> Response {
    match name.as_str() {
        "cat.png" => ([(header::CONTENT_TYPE, "image/png")], state.png.clone()).into_response(),
        "page.html" => (
            [(header::CONTENT_TYPE, "text/html")],
            "<html><body>not an image</body></html>",
        )
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Encodes a solid-colour PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let raster = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 64, 0])));
    let mut buf = Cursor::new(Vec::new());
    raster.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}
