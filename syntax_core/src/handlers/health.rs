//! Health check handler

use crate::{models::ApiResponse, AppState};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::warn;

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    match state.public.projects.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(json!({
                "status": "healthy",
                "store": "reachable",
                "version": state.version,
                "timestamp": chrono::Utc::now().timestamp(),
            }))),
        ),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: Some(json!({
                        "status": "unhealthy",
                        "store": "unreachable",
                        "version": state.version,
                        "timestamp": chrono::Utc::now().timestamp(),
                    })),
                    ..ApiResponse::error("Data store is unavailable".to_string())
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{state_with, MemoryStore};
    use axum::body::to_bytes;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_reports_store_state() {
        let store = Arc::new(MemoryStore::default());

        let response = handle_health(State(state_with(store.clone()))).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        *store.fail.lock() = true;
        let response = handle_health(State(state_with(store))).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Data store is unavailable");
        assert_eq!(body["data"]["status"], "unhealthy");
    }
}
