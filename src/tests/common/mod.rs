// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use http::StatusCode;

use crate::auth::Credentials;
use crate::config::settings::ClientSettings;
use crate::error::Result;
use crate::operations::SIGN_IN;
use crate::transport::{RequestDescriptor, Transport, TransportResponse};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn credentials() -> Credentials {
    Credentials::new("acme", "alice", "hunter2")
}

pub fn settings_with_window(refresh_window_ms: u64) -> ClientSettings {
    ClientSettings {
        refresh_window_ms,
        ..Default::default()
    }
}

#[derive(Debug, Default)]
struct Script {
    sign_ins: AtomicUsize,
    /// sign-ins after this many succeed no more
    successful_sign_ins: Option<usize>,
    sign_in_delay: Duration,
    requests: Mutex<Vec<RequestDescriptor>>,
}

/// In-memory transport: answers sign-in with `token-<n>` and echoes every
/// other request back with 200.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Script>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the first `count` sign-ins succeed; later ones get 401.
    pub fn failing_after(count: usize) -> Self {
        Self {
            script: Arc::new(Script {
                successful_sign_ins: Some(count),
                ..Default::default()
            }),
        }
    }

    pub fn with_sign_in_delay(delay: Duration) -> Self {
        Self {
            script: Arc::new(Script {
                sign_in_delay: delay,
                ..Default::default()
            }),
        }
    }

    pub fn sign_ins(&self) -> usize {
        self.script.sign_ins.load(Ordering::SeqCst)
    }

    /// Every request except sign-ins, in arrival order.
    pub fn payloads(&self) -> Vec<RequestDescriptor> {
        self.script.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<TransportResponse> {
        if request.path == SIGN_IN.path {
            let n = self.script.sign_ins.fetch_add(1, Ordering::SeqCst) + 1;
            if !self.script.sign_in_delay.is_zero() {
                tokio::time::sleep(self.script.sign_in_delay).await;
            }
            let allowed = self.script.successful_sign_ins.map_or(true, |limit| n <= limit);
            return Ok(if allowed {
                TransportResponse::new(StatusCode::OK, json!({"AuthenticationToken": format!("token-{n}")}))
            } else {
                TransportResponse::new(StatusCode::UNAUTHORIZED, json!({"Message": "bad credentials"}))
            });
        }

        let echo = json!({
            "method": request.method.as_str(),
            "path": request.path,
            "body": request.body,
        });
        self.script.requests.lock().unwrap().push(request);
        Ok(TransportResponse::new(StatusCode::OK, echo))
    }
}
