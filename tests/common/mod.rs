//! Test helpers: an in-process stand-in for the hosted record store and auth service.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

pub const API_KEY: &str = "test-key";
pub const VALID_TOKEN: &str = "valid-token";
pub const USER_ID: &str = "user-1";

#[derive(Default)]
pub struct FakeState {
    next_id: i64,
    pub rows: Vec<Value>,
    pub fail_inserts: bool,
    pub logouts: usize,
    /// Bearer token of the most recent summaries request.
    pub last_bearer: Option<String>,
}

pub struct FakeBackend {
    pub base_url: String,
    pub state: Arc<Mutex<FakeState>>,
}

pub async fn spawn_fake_backend() -> FakeBackend {
    let state = Arc::new(Mutex::new(FakeState::default()));

    let router = Router::new()
        .route(
            "/rest/v1/summaries",
            get(list_rows).post(insert_rows).delete(delete_rows),
        )
        .route("/auth/v1/user", get(current_user))
        .route("/auth/v1/logout", post(logout))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Should bind ephemeral port");
    let addr = listener.local_addr().expect("Should have local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Fake backend stopped");
    });

    FakeBackend {
        base_url: format!("http://{addr}"),
        state,
    }
}

type Shared = State<Arc<Mutex<FakeState>>>;

fn has_api_key(headers: &HeaderMap) -> bool {
    headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(API_KEY)
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn eq_filter(params: &HashMap<String, String>, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|v| v.strip_prefix("eq."))
        .map(str::to_string)
}

async fn insert_rows(
    State(state): Shared,
    headers: HeaderMap,
    Json(rows): Json<Vec<Value>>,
) -> Response {
    if !has_api_key(&headers) {
        return (StatusCode::UNAUTHORIZED, "invalid api key").into_response();
    }
    let mut state = state.lock().unwrap();
    state.last_bearer = bearer(&headers).map(str::to_string);
    if state.fail_inserts {
        return (StatusCode::SERVICE_UNAVAILABLE, "database is down").into_response();
    }

    let mut inserted = Vec::new();
    for mut row in rows {
        state.next_id += 1;
        row["id"] = json!(state.next_id);
        state.rows.push(row.clone());
        inserted.push(row);
    }
    (StatusCode::CREATED, Json(inserted)).into_response()
}

async fn list_rows(
    State(state): Shared,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !has_api_key(&headers) {
        return (StatusCode::UNAUTHORIZED, "invalid api key").into_response();
    }
    let mut state = state.lock().unwrap();
    state.last_bearer = bearer(&headers).map(str::to_string);
    let user_id = eq_filter(&params, "user_id");

    let mut rows: Vec<Value> = state
        .rows
        .iter()
        .filter(|row| match &user_id {
            Some(user_id) => row["user_id"].as_str() == Some(user_id.as_str()),
            None => true,
        })
        .cloned()
        .collect();
    if params.get("order").map(String::as_str) == Some("id.desc") {
        rows.sort_by_key(|row| std::cmp::Reverse(row["id"].as_i64()));
    }
    Json(rows).into_response()
}

async fn delete_rows(
    State(state): Shared,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !has_api_key(&headers) {
        return (StatusCode::UNAUTHORIZED, "invalid api key").into_response();
    }
    let id = eq_filter(&params, "id").and_then(|id| id.parse::<i64>().ok());
    let url = eq_filter(&params, "url");
    let user_id = eq_filter(&params, "user_id");
    if id.is_none() && url.is_none() {
        return (StatusCode::BAD_REQUEST, "delete requires a filter").into_response();
    }

    let mut state = state.lock().unwrap();
    state.last_bearer = bearer(&headers).map(str::to_string);
    let (deleted, kept): (Vec<Value>, Vec<Value>) = state.rows.drain(..).partition(|row| {
        let selected = id.is_some_and(|id| row["id"].as_i64() == Some(id))
            || url
                .as_deref()
                .is_some_and(|url| row["url"].as_str() == Some(url));
        let owned = user_id
            .as_deref()
            .map_or(true, |user_id| row["user_id"].as_str() == Some(user_id));
        selected && owned
    });
    state.rows = kept;

    let wants_rows = headers.get("prefer").and_then(|v| v.to_str().ok())
        == Some("return=representation");
    if wants_rows {
        Json(deleted).into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

async fn current_user(headers: HeaderMap) -> Response {
    if bearer(&headers) == Some(VALID_TOKEN) {
        Json(json!({ "id": USER_ID, "email": "reader@example.com", "role": "authenticated" }))
            .into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "msg": "invalid JWT" }))).into_response()
    }
}

async fn logout(State(state): Shared, headers: HeaderMap) -> StatusCode {
    if bearer(&headers).is_none() {
        return StatusCode::UNAUTHORIZED;
    }
    state.lock().unwrap().logouts += 1;
    StatusCode::NO_CONTENT
}
