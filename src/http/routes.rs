//! Route handlers.
//!
//! Thin delegates recovered from the gateway's public surface: each handler
//! forwards the call to the data or model service through the resilient
//! client and returns the classified outcome. No schema validation or
//! dispatch logic lives here; the upstream owns its own contract.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use reqwest::Method;
use serde_json::{json, Value};

use crate::http::middleware::RequestId;
use crate::http::server::AppState;
use crate::upstream::UpstreamClient;

/// Query parameters passed through to the upstream verbatim.
type PassthroughQuery = Query<Vec<(String, String)>>;

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "beatbooks-gateway" }))
}

async fn forward_get(
    client: &UpstreamClient,
    path: &str,
    query: &[(String, String)],
    request_id: &RequestId,
) -> Response {
    client
        .forward(Method::GET, path, Some(query), None, Some(request_id.as_str()))
        .await
        .into_response()
}

// --- Scraping (data service) ---

pub async fn scrape_team(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((team, year)): Path<(String, u16)>,
) -> Response {
    forward_get(&state.data, &format!("/scrape/{team}/{year}"), &[], &request_id).await
}

pub async fn scrape_year(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(year): Path<u16>,
) -> Response {
    forward_get(&state.data, &format!("/scrape/{year}"), &[], &request_id).await
}

pub async fn scrape_excel(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Option<Json<Value>>,
) -> Response {
    let body = body.as_ref().map(|Json(value)| value);
    state
        .data
        .forward(
            Method::POST,
            "/scrape/excel",
            None,
            body,
            Some(request_id.as_str()),
        )
        .await
        .into_response()
}

// --- Statistics (data service) ---

pub async fn team_stats(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(team): Path<String>,
    Query(params): PassthroughQuery,
) -> Response {
    forward_get(&state.data, &format!("/teams/{team}/stats"), &params, &request_id).await
}

pub async fn players(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): PassthroughQuery,
) -> Response {
    forward_get(&state.data, "/players", &params, &request_id).await
}

pub async fn games(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): PassthroughQuery,
) -> Response {
    forward_get(&state.data, "/games", &params, &request_id).await
}

pub async fn standings(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): PassthroughQuery,
) -> Response {
    forward_get(&state.data, "/standings", &params, &request_id).await
}

// --- Odds (data service) ---

pub async fn live_odds(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): PassthroughQuery,
) -> Response {
    forward_get(&state.data, "/odds/live", &params, &request_id).await
}

pub async fn odds_history(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(game_id): Path<String>,
    Query(params): PassthroughQuery,
) -> Response {
    forward_get(&state.data, &format!("/odds/history/{game_id}"), &params, &request_id).await
}

pub async fn best_odds(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): PassthroughQuery,
) -> Response {
    forward_get(&state.data, "/odds/best", &params, &request_id).await
}

// --- Predictions (model service) ---

pub async fn predict(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): PassthroughQuery,
) -> Response {
    forward_get(&state.model, "/predict", &params, &request_id).await
}
