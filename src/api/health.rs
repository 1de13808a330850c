use crate::api::MgmtState;
use crate::api::schemas::health::{CheckStatus, HealthResponse};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Always 200 while the process is up.
pub async fn livez() -> impl IntoResponse {
    StatusCode::OK
}

fn check_status(component: &'static str, result: Result<(), String>) -> CheckStatus {
    match result {
        Ok(()) => CheckStatus::Ok,
        Err(e) => {
            tracing::warn!(error = %e, component, "Readiness check failed");
            CheckStatus::Error
        }
    }
}

/// 200 only when both Postgres and Redis answer within their check timeouts.
pub async fn readyz(State(state): State<MgmtState>) -> impl IntoResponse {
    let (db, cache) = tokio::join!(state.health_service.check_db(), state.health_service.check_cache());

    let response = HealthResponse::new(check_status("database", db), check_status("cache", cache));
    let status_code = if response.is_ready() { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (status_code, Json(response))
}
