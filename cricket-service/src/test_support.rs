//! Fake upstream service for tests.

use axum::{
    Json, Router,
    body::Bytes,
    http::{HeaderMap, StatusCode, Uri},
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use crate::config::UpstreamConfig;

/// A request as seen by the fake upstream
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub api_key: Option<String>,
    pub body: Option<Value>,
}

/// Upstream stand-in that answers every request with one fixed response
pub struct FakeUpstream {
    addr: SocketAddr,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeUpstream {
    pub async fn respond(status: StatusCode, body: Value) -> Self {
        let recorded = Arc::new(Mutex::new(Vec::new()));
        let log = recorded.clone();

        let app = Router::new().fallback(move |uri: Uri, headers: HeaderMap, bytes: Bytes| {
            let log = log.clone();
            let body = body.clone();
            async move {
                log.lock().unwrap().push(RecordedRequest {
                    path: uri.path().to_string(),
                    api_key: headers
                        .get("x-api-key")
                        .and_then(|v| v.to_str().ok())
                        .map(String::from),
                    body: serde_json::from_slice(&bytes).ok(),
                });
                (status, Json(body))
            }
        });

        Self {
            addr: serve(app).await,
            recorded,
        }
    }

    pub fn config(&self) -> UpstreamConfig {
        UpstreamConfig {
            base_url: format!("http://{}", self.addr),
            api_key: "test-key".to_string(),
            request_timeout_secs: 5,
        }
    }

    /// Config pointing at a port nothing listens on
    pub async fn unreachable_config() -> UpstreamConfig {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        UpstreamConfig {
            base_url: format!("http://{}", addr),
            api_key: "test-key".to_string(),
            request_timeout_secs: 5,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }
}

/// Serve a router on an ephemeral local port
pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
