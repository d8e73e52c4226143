use crate::presentation::http::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    /// Open connections, idle ones included
    pool_size: u32,
    idle_connections: usize,
    max_connections: u32,
    version: &'static str,
}

/// `GET /health`: 200 when Postgres answers, 503 otherwise.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let reachable = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(error = %e, "health check: database unreachable");
            false
        }
    };

    let (status, database, code) = if reachable {
        ("healthy", "up", StatusCode::OK)
    } else {
        ("unhealthy", "down", StatusCode::SERVICE_UNAVAILABLE)
    };

    let response = HealthResponse {
        status,
        database,
        pool_size: state.db.size(),
        idle_connections: state.db.num_idle(),
        max_connections: state.config.database_max_connections,
        version: env!("CARGO_PKG_VERSION"),
    };

    (code, Json(response))
}
