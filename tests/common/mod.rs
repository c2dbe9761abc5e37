#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    Json, Router,
};
use pay_service_client::{FailureMetadata, Hooks, RequestMetadata, SuccessMetadata};
use serde_json::{json, Value as JsonValue};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

#[derive(Clone)]
pub struct MockResponse {
    status: StatusCode,
    body: JsonValue,
    delay: Duration,
}

impl MockResponse {
    pub fn json(status: StatusCode, body: JsonValue) -> Self {
        Self {
            status,
            body,
            delay: Duration::from_millis(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// What the mock server saw for one request.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn json_body(&self) -> JsonValue {
        serde_json::from_str(&self.body).expect("request body must be JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

#[derive(Clone)]
struct MockState {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    hits: Arc<AtomicUsize>,
}

async fn mock_handler(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state
        .requests
        .lock()
        .expect("request log mutex must not be poisoned")
        .push(RecordedRequest {
            method,
            path: uri.path().to_owned(),
            query: uri.query().map(str::to_owned),
            headers,
            body,
        });

    let response = {
        let mut queue = state
            .responses
            .lock()
            .expect("response queue mutex must not be poisoned");
        queue.pop_front().unwrap_or_else(|| {
            MockResponse::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "no mock response available"}),
            )
        })
    };

    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }

    (response.status, Json(response.body))
}

pub struct TestServer {
    pub base_url: String,
    pub hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl TestServer {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("request log mutex must not be poisoned")
            .clone()
    }
}

pub async fn spawn_server(responses: Vec<MockResponse>) -> TestServer {
    let state = MockState {
        responses: Arc::new(Mutex::new(responses.into())),
        requests: Arc::new(Mutex::new(Vec::new())),
        hits: Arc::new(AtomicUsize::new(0)),
    };

    let app = Router::new()
        .fallback(mock_handler)
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("mock server must run");
    });

    TestServer {
        base_url: format!("http://{address}"),
        hits: state.hits,
        requests: state.requests,
        task,
    }
}

/// Server that resets the first `resets` connections after reading the
/// request head, then answers every later one with `200` and `body`.
pub async fn spawn_resetting_server(resets: usize, body: JsonValue) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let payload = body.to_string();

    let task = tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let seen = counter.fetch_add(1, Ordering::SeqCst);
            read_request_head(&mut stream).await;

            if seen < resets {
                // SO_LINGER 0 makes the close send RST instead of FIN.
                #[allow(deprecated)]
                let _ = stream.set_linger(Some(Duration::ZERO));
                drop(stream);
                continue;
            }

            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                payload.len(),
                payload
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    TestServer {
        base_url: format!("http://{address}"),
        hits,
        requests: Arc::new(Mutex::new(Vec::new())),
        task,
    }
}

async fn read_request_head(stream: &mut TcpStream) {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(read) => {
                head.extend_from_slice(&chunk[..read]);
                if head.windows(4).any(|window| window == b"\r\n\r\n") {
                    return;
                }
            }
        }
    }
}

/// An address nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    drop(listener);
    format!("http://{address}")
}

/// Hook table that records every call.
#[derive(Clone, Default)]
pub struct HookRecorder {
    pub starts: Arc<Mutex<Vec<RequestMetadata>>>,
    pub successes: Arc<Mutex<Vec<SuccessMetadata>>>,
    pub failures: Arc<Mutex<Vec<FailureMetadata>>>,
}

impl HookRecorder {
    pub fn hooks(&self) -> Hooks {
        let starts = Arc::clone(&self.starts);
        let successes = Arc::clone(&self.successes);
        let failures = Arc::clone(&self.failures);
        Hooks::new()
            .on_request_start(move |meta| starts.lock().expect("poisoned").push(meta.clone()))
            .on_success_response(move |meta| {
                successes.lock().expect("poisoned").push(meta.clone())
            })
            .on_failure_response(move |meta| {
                failures.lock().expect("poisoned").push(meta.clone())
            })
    }

    pub fn starts(&self) -> Vec<RequestMetadata> {
        self.starts.lock().expect("poisoned").clone()
    }

    pub fn successes(&self) -> Vec<SuccessMetadata> {
        self.successes.lock().expect("poisoned").clone()
    }

    pub fn failures(&self) -> Vec<FailureMetadata> {
        self.failures.lock().expect("poisoned").clone()
    }
}
