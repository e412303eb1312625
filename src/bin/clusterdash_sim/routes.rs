use super::*;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;
use serde_json::json;

use self::sim_state::StatePatch;

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/api/current", get(api_current))
        .route("/api/invocations", get(api_invocations))
        .route("/api/hosts", get(api_hosts))
        .route("/api/invocation/:id", get(api_invocation))
        .route("/api/invoke/:url", get(api_invoke))
        .route("/api/reinvoke/:id", get(api_reinvoke))
        .route("/api/cancel", get(api_cancel))
        .route("/ctl/state", post(ctl_state))
        .route("/ctl/fail/:resource", post(ctl_fail))
        .route("/ctl/clear-fail/:resource", post(ctl_clear_fail))
        .route("/ctl/garbage/:resource", post(ctl_garbage))
        .route("/ctl/logs/:id/:hostname", post(ctl_logs))
        .with_state(state)
}

fn ok(payload: serde_json::Value) -> Response {
    Json(json!({ "status": "ok", "payload": payload })).into_response()
}

fn ok_void() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}

fn error(msg: Option<&str>) -> Response {
    // The envelope carries the error; HTTP status stays 200 like the
    // original server's JSON catchers.
    match msg {
        Some(msg) => Json(json!({ "status": "error", "msg": msg })).into_response(),
        None => Json(json!({ "status": "error" })).into_response(),
    }
}

/// Scripted overrides shared by every `/api` handler: a forced failure wins,
/// then a garbage body, then the real answer.
async fn override_for(state: &AppState, resource: &str) -> Option<Response> {
    let sim = state.sim.read().await;
    if let Some(msg) = sim.failures.get(resource) {
        return Some(error(msg.as_deref()));
    }
    if sim.garbage.get(resource).copied().unwrap_or(false) {
        return Some("<not json>".into_response());
    }
    None
}

async fn api_current(State(state): State<AppState>) -> Response {
    if let Some(overridden) = override_for(&state, "current").await {
        return overridden;
    }
    let sim = state.sim.read().await;
    ok(json!(sim.current))
}

async fn api_invocations(State(state): State<AppState>) -> Response {
    if let Some(overridden) = override_for(&state, "invocations").await {
        return overridden;
    }
    let sim = state.sim.read().await;
    let summaries: Vec<_> = sim.invocations.iter().map(|inv| inv.summary()).collect();
    ok(json!(summaries))
}

async fn api_hosts(State(state): State<AppState>) -> Response {
    if let Some(overridden) = override_for(&state, "hosts").await {
        return overridden;
    }
    let sim = state.sim.read().await;
    ok(json!(sim.hosts))
}

async fn api_invocation(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if let Some(overridden) = override_for(&state, "invocation").await {
        return overridden;
    }
    let sim = state.sim.read().await;
    match sim.invocation(&InvocationId(id)) {
        Some(detail) => ok(json!(detail)),
        None => error(Some("no such invocation")),
    }
}

async fn api_invoke(State(state): State<AppState>, Path(url): Path<String>) -> Response {
    if let Some(overridden) = override_for(&state, "invoke").await {
        return overridden;
    }
    let mut sim = state.sim.write().await;
    let detail = sim.invoke(&url);
    ok(json!(detail))
}

async fn api_reinvoke(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if let Some(overridden) = override_for(&state, "reinvoke").await {
        return overridden;
    }
    let mut sim = state.sim.write().await;
    match sim.reinvoke(&InvocationId(id)) {
        Some(detail) => ok(json!(detail)),
        None => error(Some("no such invocation")),
    }
}

async fn api_cancel(State(state): State<AppState>) -> Response {
    if let Some(overridden) = override_for(&state, "cancel").await {
        return overridden;
    }
    let mut sim = state.sim.write().await;
    if sim.current.take().is_some() {
        ok_void()
    } else {
        error(Some("no active invocation"))
    }
}

async fn ctl_state(State(state): State<AppState>, Json(patch): Json<StatePatch>) -> StatusCode {
    state.sim.write().await.apply(patch);
    StatusCode::NO_CONTENT
}

async fn ctl_fail(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    msg: String,
) -> StatusCode {
    let msg = if msg.is_empty() { None } else { Some(msg) };
    state.sim.write().await.failures.insert(resource, msg);
    StatusCode::NO_CONTENT
}

async fn ctl_clear_fail(
    State(state): State<AppState>,
    Path(resource): Path<String>,
) -> StatusCode {
    state.sim.write().await.failures.remove(&resource);
    StatusCode::NO_CONTENT
}

async fn ctl_garbage(
    State(state): State<AppState>,
    Path(resource): Path<String>,
) -> StatusCode {
    let mut sim = state.sim.write().await;
    let entry = sim.garbage.entry(resource).or_insert(false);
    *entry = !*entry;
    StatusCode::NO_CONTENT
}

async fn ctl_logs(
    State(state): State<AppState>,
    Path((id, hostname)): Path<(String, String)>,
    url: String,
) -> StatusCode {
    let mut sim = state.sim.write().await;
    let id = InvocationId(id);
    let Some(detail) = sim.invocations.iter_mut().find(|inv| inv.id == id) else {
        return StatusCode::NOT_FOUND;
    };
    detail.logs.insert(hostname, url);
    StatusCode::NO_CONTENT
}
