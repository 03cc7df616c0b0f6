#![allow(dead_code)]

use axum::{extract::State, http::Method, http::StatusCode, routing::any, Router};
use floorops_core::DashboardConfig;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Behavior {
    pub head_status: StatusCode,
    pub get_status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            head_status: StatusCode::OK,
            get_status: StatusCode::OK,
            body: "{}".to_string(),
            delay: Duration::ZERO,
        }
    }
}

#[derive(Default)]
struct Shared {
    behavior: Mutex<Behavior>,
    heads: AtomicUsize,
    gets: AtomicUsize,
}

/// In-process stand-in for the floor server's `/data` endpoint.
pub struct StubServer {
    addr: SocketAddr,
    shared: Arc<Shared>,
    _handle: tokio::task::JoinHandle<()>,
}

impl StubServer {
    pub async fn start(behavior: Behavior) -> Self {
        let shared = Arc::new(Shared {
            behavior: Mutex::new(behavior),
            ..Shared::default()
        });
        let app = Router::new()
            .route("/data", any(data_handler))
            .with_state(shared.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        Self {
            addr,
            shared,
            _handle: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.shared.behavior.lock().unwrap() = behavior;
    }

    pub fn update<F: FnOnce(&mut Behavior)>(&self, f: F) {
        f(&mut self.shared.behavior.lock().unwrap());
    }

    pub fn head_count(&self) -> usize {
        self.shared.heads.load(Ordering::SeqCst)
    }

    pub fn get_count(&self) -> usize {
        self.shared.gets.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> DashboardConfig {
        test_config(&self.base_url())
    }
}

async fn data_handler(State(shared): State<Arc<Shared>>, method: Method) -> (StatusCode, String) {
    let behavior = shared.behavior.lock().unwrap().clone();
    if !behavior.delay.is_zero() {
        tokio::time::sleep(behavior.delay).await;
    }
    if method == Method::HEAD {
        shared.heads.fetch_add(1, Ordering::SeqCst);
        (behavior.head_status, String::new())
    } else {
        shared.gets.fetch_add(1, Ordering::SeqCst);
        (behavior.get_status, behavior.body)
    }
}

pub fn test_config(base_url: &str) -> DashboardConfig {
    DashboardConfig {
        base_url: base_url.to_string(),
        probe_interval: Duration::from_millis(50),
        probe_timeout: Duration::from_millis(300),
        fetch_timeout: Duration::from_millis(300),
        clock_tick: Duration::from_millis(20),
    }
}

/// A base url nothing is listening on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub const FLOOR_PAYLOAD: &str = r#"{
    "analytics": {
        "total": 18, "open": 2, "avg_resp": 1.5, "avg_dlv": 9,
        "hourly": {"0": 3, "2": 8, "6": 1},
        "open_count": 5, "closed_count": 7,
        "extra": "ignored"
    },
    "live_status": [
        {"table_id": 4, "status": "Customer_Called", "minutes_ago": 2},
        {"table_id": 7, "status": "Waiter_Responded", "minutes_ago": 6},
        {"table_id": "B2", "status": "Idle", "minutes_ago": 40, "note": "window"}
    ]
}"#;
