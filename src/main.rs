use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;

use foodmed_auth::config::AppConfig;
use foodmed_auth::routes;
use foodmed_auth::services::email::EmailService;
use foodmed_auth::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = AppConfig::from_env();

    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| format!("failed to create data dir {}", config.data_dir.display()))?;

    let app_state = initialize_app_state(&config)?;
    let app = routes::router(app_state);

    start_server(app, &config).await
}

fn initialize_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let mut app_state = AppState::new(&config.data_dir);

    match &config.email {
        Some(email_config) => {
            let mailer = EmailService::new(email_config).context("failed to build mail client")?;
            app_state = app_state.with_mailer(Arc::new(mailer));
            tracing::info!("mail service initialized");
        }
        None => {
            tracing::warn!("EMAIL_API_URL/EMAIL_API_KEY not set, OTP delivery will fail");
        }
    }

    Ok(app_state)
}

async fn start_server(app: axum::Router, config: &AppConfig) -> anyhow::Result<()> {
    let host: std::net::IpAddr = config
        .host
        .parse()
        .with_context(|| format!("invalid HOST {}", config.host))?;
    let addr = SocketAddr::from((host, config.port));

    tracing::info!("server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
