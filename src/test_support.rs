//! Shared helpers for async tests

use axum::{Json, Router, routing::post};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Stand-in for the refine service
pub struct RefineStub {
    pub endpoint: String,
    received: Arc<Mutex<Vec<Value>>>,
}

impl RefineStub {
    /// Serve `reply` to every POST on `/api/refine/` of a random local port
    pub async fn start(reply: Value) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let recorded = received.clone();
        let app = Router::new().route(
            "/api/refine/",
            post(move |Json(body): Json<Value>| {
                let recorded = recorded.clone();
                let reply = reply.clone();
                async move {
                    recorded.lock().unwrap().push(body);
                    Json(reply)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            endpoint: format!("http://{addr}/api/refine/"),
            received,
        }
    }

    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

/// An endpoint on which nothing listens
pub async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/refine/")
}
