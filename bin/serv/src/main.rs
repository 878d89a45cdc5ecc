use axum::{Router, middleware, routing::get};
use parla_api::{config::ApiConfig, state::ApiState};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the environment may already be set
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    parla_api::tracing::init_tracing(config.env);

    let pool = parla_db::create_pool(&config.database_url, config.db_max_connections).await?;
    parla_db::ensure_db_and_migrate(&config.database_url, &pool).await?;
    tracing::info!("Database ready");

    let metrics_handle = parla_api::metrics::init_metrics()?;

    let state = ApiState::new(&config, pool)?;

    let cors = parla_api::middleware::create_cors_layer(&config.allowed_origins);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Prometheus scrape endpoint with its own state
    let metrics_app = Router::new()
        .route("/metrics", get(parla_api::metrics::metrics_handler))
        .with_state(metrics_handle);

    let app = parla_api::router::router()
        .with_state(state)
        .merge(metrics_app)
        .layer(cors)
        .layer(trace_layer)
        .layer(middleware::from_fn(parla_api::metrics::track_metrics))
        .layer(middleware::from_fn(
            parla_api::middleware::request_id_middleware,
        ));
    let app = parla_api::middleware::apply_security_headers(app, config.env);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.env,
        model = %config.gemini_model,
        ai_enabled = config.gemini_api_key.is_some(),
        "Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
