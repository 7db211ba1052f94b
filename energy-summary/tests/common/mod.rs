#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

pub const FROM: i64 = 1_704_067_200;
pub const TO: i64 = 1_704_153_600;

#[derive(Clone)]
pub enum Reply {
    Json(Value),
    Delayed(Duration, Value),
    Status(u16),
    Raw(&'static str),
}

/// In-process stand-in for `/v2/samples`. Replies are keyed by
/// `<aggregation_level>:<page>`, the first page being `1`.
#[derive(Clone, Default)]
pub struct MockApi {
    replies: Arc<Mutex<HashMap<String, Reply>>>,
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
    hits: Arc<AtomicUsize>,
}

impl MockApi {
    pub fn reply(&self, level: &str, page: u32, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .insert(format!("{level}:{page}"), reply);
        self
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.requests.lock().unwrap().clone()
    }

    /// Binds an ephemeral port and returns the base URL.
    pub async fn serve(&self) -> String {
        let app = Router::new()
            .route("/v2/samples", get(samples))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{addr}")
    }
}

async fn samples(
    State(api): State<MockApi>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    api.hits.fetch_add(1, Ordering::SeqCst);
    api.requests.lock().unwrap().push(params.clone());

    let level = params.get("aggregation_level").cloned().unwrap_or_default();
    let page = params.get("page").cloned().unwrap_or_else(|| "1".to_string());
    let reply = api
        .replies
        .lock()
        .unwrap()
        .get(&format!("{level}:{page}"))
        .cloned();

    match reply {
        Some(Reply::Json(body)) => Json(body).into_response(),
        Some(Reply::Delayed(delay, body)) => {
            tokio::time::sleep(delay).await;
            Json(body).into_response()
        }
        Some(Reply::Status(code)) => StatusCode::from_u16(code).unwrap().into_response(),
        Some(Reply::Raw(body)) => (StatusCode::OK, body).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub fn sample(id: &str, timestamp: i64, energy: &[(&str, f64)]) -> Value {
    let energy: Vec<Value> = energy
        .iter()
        .map(|(sensor_id, value)| json!({"sensor_id": sensor_id, "value": value}))
        .collect();
    let power: Vec<Value> = energy
        .iter()
        .map(|reading| json!({"sensor_id": reading["sensor_id"], "value": 1000.0}))
        .collect();

    json!({
        "type": "samples",
        "id": id,
        "attributes": {
            "timestamp": timestamp,
            "energy": energy,
            "power": power,
        }
    })
}

pub fn page(samples: Vec<Value>, next: Option<String>) -> Value {
    match next {
        Some(next) => json!({"data": samples, "links": {"next": next}}),
        None => json!({"data": samples, "links": {}}),
    }
}

/// Relative link to page `n` of a level.
pub fn next_link(level: &str, n: u32) -> Option<String> {
    Some(format!("/v2/samples?aggregation_level={level}&page={n}"))
}
