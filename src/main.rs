use geoscore::{
    router, AppState, DashboardConfig, DashboardService, GoogleSheetSource, LoadCache, Loader,
    SystemClock, Validator,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geoscore=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting GeoGuessr score dashboard");

    let config = DashboardConfig::from_env()?;
    info!(
        source = %config.source,
        worksheet = %config.worksheet,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "Configuration loaded"
    );

    let source = Arc::new(GoogleSheetSource::new(
        config.http_timeout,
        config.token.clone(),
    )?);
    let loader = Loader::new(source, Validator::new(config.date_policy));
    let cache = Arc::new(LoadCache::new(config.cache_ttl, Arc::new(SystemClock)));
    let dashboard = DashboardService::new(loader, cache, config.sheet_request());

    let app_state = AppState::new(Arc::new(dashboard));

    let app = router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
