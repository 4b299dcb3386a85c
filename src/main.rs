use axum::http::HeaderValue;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use lecon_admin::config::{config, ApiConfig};
use lecon_admin::handlers::{self, AppState};
use lecon_admin::links::{BotFileApi, DisabledLinks, HttpLinkValidator, LinkIssuer, LinkValidator};
use lecon_admin::store::open_store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, BOT_TOKEN, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    tracing::info!("Starting lecon-admin in {:?} mode", config.environment);

    let store = open_store(&config.store).await?;

    let (issuer, validator): (Arc<dyn LinkIssuer>, Arc<dyn LinkValidator>) =
        match BotFileApi::from_config(&config.bot) {
            Ok(api) => {
                let api = Arc::new(api);
                (api.clone(), api)
            }
            Err(e) => {
                tracing::warn!("Course document links cannot be issued: {}", e);
                (Arc::new(DisabledLinks), Arc::new(HttpLinkValidator::from_config(&config.bot)?))
            }
        };

    let mut app = handlers::router(AppState::new(store, issuer, validator)).layer(cors_layer(&config.api));
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("lecon-admin listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(api: &ApiConfig) -> CorsLayer {
    if api.cors_origins.is_empty() || api.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = api
        .cors_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    CorsLayer::permissive().allow_origin(AllowOrigin::list(origins))
}
