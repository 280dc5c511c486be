use menu_cloud::BoxError;
use menu_cloud::api;
use menu_cloud::config::Config;
use menu_cloud::state::AppState;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "menu_cloud=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting menu-cloud (env: {})", config.environment);

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let state = AppState::new(config).await?;
    let app = api::build_app(state);

    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("menu-cloud HTTP listening on {http_addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
