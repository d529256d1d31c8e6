use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::counters::CounterStore;
use crate::infrastructure::db::{check_connection, DbPool};

#[derive(Clone)]
pub struct HealthState {
    pub pool: Arc<DbPool>,
    pub counters: Arc<dyn CounterStore>,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(state): State<HealthState>) -> impl IntoResponse {
    let database_ok = check_connection(&state.pool).await.is_ok();
    let counters_ok = state.counters.health_check().await.is_ok();

    let status = if database_ok && counters_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let readiness = if status == StatusCode::OK { "ready" } else { "not_ready" };
    let database = if database_ok { "connected" } else { "disconnected" };
    let counters = if counters_ok { "available" } else { "unavailable" };

    (
        status,
        Json(json!({
            "status": readiness,
            "database": database,
            "counters": {
                "backend": state.counters.backend_name(),
                "status": counters,
            }
        })),
    )
}
