//! HTTP/JSON API layer
//!
//! The browser client talks to this router directly, so CORS is permissive
//! and every payload is camelCase JSON.
//!
//! Endpoints:
//! - GET  /leaderboard?address=<opt>  ranked board, plus the caller's profile
//! - POST /leaderboard                submit a finished run
//! - GET  /health
//! - GET  /metrics                    Prometheus text

use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::leaderboard::profile::ProfileView;
use crate::leaderboard::service::LeaderboardService;
use crate::leaderboard::LeaderboardError;
use crate::metrics::Metrics;

/// Shared state available to all API handlers
#[derive(Clone)]
pub struct ApiState {
    pub leaderboard: Arc<LeaderboardService>,
    pub metrics: Arc<Metrics>,
}

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    pub address: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub address: String,
    pub score: f64,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub xp_gained: u64,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub profile: ProfileView,
    pub leaderboard: Vec<ProfileView>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn leaderboard_error_response(state: &ApiState, err: LeaderboardError) -> Response {
    match err {
        LeaderboardError::InvalidAddress => {
            state.metrics.rejected_submissions.fetch_add(1, Ordering::Relaxed);
            error_response(StatusCode::BAD_REQUEST, "invalid address")
        }
        LeaderboardError::InvalidScore => {
            state.metrics.rejected_submissions.fetch_add(1, Ordering::Relaxed);
            error_response(StatusCode::BAD_REQUEST, "invalid score")
        }
        LeaderboardError::Store(err) => {
            state.metrics.store_errors.fetch_add(1, Ordering::Relaxed);
            error!(error = %err, "leaderboard store failure");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "storage unavailable")
        }
    }
}

async fn get_leaderboard(
    State(state): State<ApiState>,
    Query(query): Query<LeaderboardQuery>,
) -> Response {
    match state.leaderboard.query_leaderboard(query.address.as_deref()) {
        Ok(out) => {
            state.metrics.leaderboard_reads.fetch_add(1, Ordering::Relaxed);
            let mut body = json!({ "leaderboard": out.leaderboard });
            if query.address.is_some() {
                body["profile"] = match out.profile {
                    Some(view) => json!(view),
                    None => serde_json::Value::Null,
                };
            }
            Json(body).into_response()
        }
        Err(err) => leaderboard_error_response(&state, err),
    }
}

async fn post_leaderboard(
    State(state): State<ApiState>,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = body else {
        state.metrics.rejected_submissions.fetch_add(1, Ordering::Relaxed);
        return error_response(StatusCode::BAD_REQUEST, "invalid request body");
    };
    match state
        .leaderboard
        .submit_run(&req.address, req.score, req.verified, req.xp_gained)
    {
        Ok(out) => {
            state.metrics.submissions.fetch_add(1, Ordering::Relaxed);
            if req.verified {
                state.metrics.verified_submissions.fetch_add(1, Ordering::Relaxed);
            }
            Json(SubmitResponse {
                profile: out.profile,
                leaderboard: out.leaderboard,
            })
            .into_response()
        }
        Err(err) => leaderboard_error_response(&state, err),
    }
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn prometheus_metrics(State(state): State<ApiState>) -> String {
    state.metrics.to_prometheus()
}

/// Build the full API router
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/leaderboard", get(get_leaderboard).post(post_leaderboard))
        .route("/health", get(health_check))
        .route("/metrics", get(prometheus_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::store::MemoryStore;

    fn state() -> ApiState {
        ApiState {
            leaderboard: Arc::new(LeaderboardService::new(MemoryStore::shared())),
            metrics: Arc::new(Metrics::new()),
        }
    }

    #[test]
    fn test_submit_request_defaults() {
        let req: SubmitRequest = serde_json::from_str(
            r#"{"address":"0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa","score":12}"#,
        )
        .unwrap();
        assert!(!req.verified);
        assert_eq!(req.xp_gained, 0);
    }

    #[test]
    fn test_submit_request_camel_case_xp() {
        let req: SubmitRequest = serde_json::from_str(
            r#"{"address":"0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa","score":1,"xpGained":9}"#,
        )
        .unwrap();
        assert_eq!(req.xp_gained, 9);
    }

    #[test]
    fn test_router_builds() {
        let _router = build_router(state());
    }
}
