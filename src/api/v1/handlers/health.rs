/*
 * Responsibility
 * - GET /health (liveness probe; no auth, no envelope consumers depend on it)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
