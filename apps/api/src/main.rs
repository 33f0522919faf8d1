use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_api::config::Config;
use resume_api::docgen::{Credentials, PdfServicesClient};
use resume_api::routes::build_router;
use resume_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing credentials)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("resume_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize document-generation client
    let merger = PdfServicesClient::new(
        config.pdf_services_base_url.clone(),
        Credentials {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        },
    )?;
    info!("PDF Services client initialized ({})", config.pdf_services_base_url);

    tokio::fs::create_dir_all(&config.output_dir).await?;

    let state = AppState::new(&config, Arc::new(merger));
    for missing in state.templates.missing() {
        warn!(
            template = %missing,
            dir = %state.templates.dir().display(),
            "Template file not found: {}",
            missing.file_name()
        );
    }

    let app = build_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Server is running on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
