use std::sync::Arc;

use igabaycare_appointments::{
    appointments::BucketOrder,
    clock::Clock,
    config::Config,
    db,
    models::AppState,
    routes,
    store::PgAppointmentStore,
};

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use axum::http::header;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = Config::from_env()?;
    let pool = db::connect_pg(&cfg.database_url, cfg.db_max_connections).await?;

    let state = AppState {
        db: pool.clone(),
        appointments: Arc::new(PgAppointmentStore::new(pool)),
        clock: Clock::system(cfg.utc_offset_minutes)?,
        bucket_order: BucketOrder::default(),
        recent_window_days: cfg.recent_window_days,
        fetch_timeout: cfg.fetch_timeout,
    };

    // web dashboards and the mobile shell call from other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]);

    let app = routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    tracing::info!(
        utc_offset_minutes = cfg.utc_offset_minutes,
        recent_window_days = cfg.recent_window_days,
        "Listening on http://{}",
        cfg.bind_addr
    );
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
