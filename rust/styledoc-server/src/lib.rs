//! The thinnest possible HTTP layer over `styledoc-jobs`: translates verbs
//! and SSE framing, carries no business logic of its own.

pub mod error;
pub mod quota;
mod routes;
mod state;

pub use quota::{InMemoryQuotaGate, QuotaGate, Usage};
pub use state::AppState;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/usage", get(routes::usage::get_usage))
        .route("/specs", get(routes::specs::list_specs))
        .route("/specs/schema", get(routes::specs::get_schema))
        .route("/specs/validate", post(routes::specs::validate_spec))
        .route("/specs/generate", post(routes::specs::generate_spec))
        .route("/format/text", post(routes::format::format_text))
        .route("/format/file", post(routes::format::format_file))
        .route("/jobs", get(routes::jobs::list_jobs))
        .route("/jobs/{job_id}", get(routes::jobs::get_job_status).delete(routes::jobs::delete_job))
        .route("/jobs/{job_id}/stream", get(routes::jobs::stream_job_progress))
        .route("/jobs/{job_id}/download", get(routes::jobs::download_result))
        .route("/jobs/{job_id}/report", get(routes::jobs::get_validation_report))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use styledoc_jobs::JobManager;

    use super::*;

    fn test_state() -> AppState {
        AppState::new(Arc::new(JobManager::new(2, 24)), Arc::new(InMemoryQuotaGate::default()), None, 0)
    }

    #[tokio::test]
    async fn usage_requires_a_card_key() {
        let app = build_router(test_state());
        let response = app.oneshot(Request::builder().uri("/usage?card_key=abc").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn usage_rejects_empty_card_key() {
        let app = build_router(test_state());
        let response = app.oneshot(Request::builder().uri("/usage?card_key=").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn list_specs_returns_builtin_names() {
        let app = build_router(test_state());
        let response = app.oneshot(Request::builder().uri("/specs").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["specs"].as_array().unwrap().len() >= 2);
    }

    #[tokio::test]
    async fn format_text_rejects_empty_body() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/format/text?card_key=abc")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"text": ""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_job_status_returns_not_found_for_unknown_job() {
        let app = build_router(test_state());
        let job_id = uuid::Uuid::new_v4();
        let response = app.oneshot(Request::builder().uri(format!("/jobs/{job_id}?card_key=abc")).body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
