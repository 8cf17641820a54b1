use server::{app, AppState, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,pipeline_core=info,data_core=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let addr = config.addr()?;
    tracing::info!(
        max_upload_bytes = config.max_upload_bytes,
        session_ttl_secs = config.session_ttl.as_secs(),
        "configuration loaded"
    );

    let state = AppState::new(config);
    tracing::info!("forecast server v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
