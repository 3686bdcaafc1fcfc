use crate::models::{ApiOk, AppState, OkData};
use axum::{Json, Router, routing::get};

pub mod appointment_routes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", appointment_routes::router())
        .route("/health", get(health))
        .with_state(state)
}

pub async fn health() -> Json<ApiOk<OkData>> {
    Json(ApiOk { data: OkData { ok: true } })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointments::BucketOrder;
    use crate::clock::Clock;
    use crate::store::memory::MemoryStore;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use chrono::NaiveDate;
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app() -> Router {
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://igabay@localhost/igabay_test")
            .unwrap();
        router(AppState {
            db,
            appointments: Arc::new(MemoryStore::default()),
            clock: Clock::Fixed(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()),
            bucket_order: BucketOrder::default(),
            recent_window_days: 30,
            fetch_timeout: Duration::from_secs(1),
        })
    }

    #[tokio::test]
    async fn health_needs_no_session() {
        let resp = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = to_bytes(resp.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["ok"], true);
    }

    #[tokio::test]
    async fn appointments_without_bearer_token_are_401() {
        let uri = format!("/api/v1/patients/{}/appointments", uuid::Uuid::new_v4());
        let resp = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = to_bytes(resp.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "SESSION_EXPIRED");
    }
}
