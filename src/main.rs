use axum::Router;
use sanbernard_rs::{config, routes, state};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sanbernard_rs=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();
    let port = config.port;
    let max_file_size = config.max_file_size;
    let state = state::AppState::new(config);

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::estimate::router())
        .merge(routes::weather::router())
        .merge(routes::history::router())
        .merge(routes::garmin::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(axum::extract::DefaultBodyLimit::max(max_file_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("Failed to bind {}: {}", addr, err);
            std::process::exit(1);
        }
    };

    tracing::info!("SanBernard API listening on {}", addr);
    tracing::info!("Health check: http://{}/api/health", addr);
    tracing::info!("Estimate: POST http://{}/api/parse-gpx", addr);
    tracing::info!("Weather: POST http://{}/api/weather", addr);
    tracing::info!("Calibrate: POST http://{}/api/analyze-history", addr);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", err);
    }
}
