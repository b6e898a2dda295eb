use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{post, put},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

/// Site id / API key pair the server accepts as basic auth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub site_id: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(site_id: &str, api_key: &str) -> Self {
        Self {
            site_id: site_id.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub name: String,
    pub data: Map<String, Value>,
}

#[derive(Debug, Default)]
pub struct Data {
    pub customers: HashMap<String, Map<String, Value>>,
    pub events: HashMap<String, Vec<Event>>,
}

pub type Store = Arc<RwLock<Data>>;

#[derive(Clone)]
struct AppState {
    store: Store,
    credentials: Arc<Credentials>,
}

pub fn app(credentials: Credentials) -> Router {
    app_with_store(credentials, Store::default())
}

/// Build the router over an existing store so tests can inspect it.
pub fn app_with_store(credentials: Credentials, store: Store) -> Router {
    let state = AppState {
        store,
        credentials: Arc::new(credentials),
    };
    Router::new()
        .route("/api/v1/customers/{id}", put(upsert_customer).delete(delete_customer))
        .route("/api/v1/customers/{id}/events", post(track_event))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}

pub async fn run(listener: TcpListener, credentials: Credentials) -> Result<(), std::io::Error> {
    run_with_store(listener, credentials, Store::default()).await
}

pub async fn run_with_store(
    listener: TcpListener,
    credentials: Credentials,
    store: Store,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_store(credentials, store)).await
}

/// Reject unauthenticated requests before any body extraction runs.
async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    authorize(request.headers(), &state.credentials)?;
    Ok(next.run(request).await)
}

/// Check the `authorization` header against the configured pair.
fn authorize(headers: &HeaderMap, expected: &Credentials) -> Result<(), StatusCode> {
    let encoded = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let decoded = STANDARD.decode(encoded).map_err(|_| StatusCode::UNAUTHORIZED)?;
    let pair = String::from_utf8(decoded).map_err(|_| StatusCode::UNAUTHORIZED)?;
    let (site_id, api_key) = pair.split_once(':').ok_or(StatusCode::UNAUTHORIZED)?;
    if site_id == expected.site_id && api_key == expected.api_key {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn upsert_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(attributes): Json<Map<String, Value>>,
) -> Result<StatusCode, StatusCode> {
    let mut data = state.store.write().await;
    data.customers.entry(id.clone()).or_default().extend(attributes);
    debug!(%id, "customer upserted");
    Ok(StatusCode::OK)
}

async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let mut data = state.store.write().await;
    data.events.remove(&id);
    data.customers
        .remove(&id)
        .map(|_| StatusCode::OK)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn track_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<StatusCode, StatusCode> {
    let name = body
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .ok_or(StatusCode::BAD_REQUEST)?;
    let data = body
        .get("data")
        .and_then(Value::as_object)
        .ok_or(StatusCode::BAD_REQUEST)?;
    let event = Event {
        name: name.to_string(),
        data: data.clone(),
    };
    info!(%id, name = %event.name, "event tracked");
    state.store.write().await.events.entry(id).or_default().push(event);
    Ok(StatusCode::OK)
}
