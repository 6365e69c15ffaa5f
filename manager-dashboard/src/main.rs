use dotenvy::dotenv;
use manager_dashboard::config::get_configuration;
use manager_dashboard::services::{auth_client::AuthClient, enrollment_client::EnrollmentClient};
use manager_dashboard::startup::build_router;
use manager_dashboard::AppState;
use service_core::observability::logging::init_tracing;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("manager-dashboard", &configuration.telemetry);

    let auth_client = Arc::new(AuthClient::new(configuration.auth_service.clone()));
    let enrollment_client = Arc::new(EnrollmentClient::new(
        configuration.enrollment_service.clone(),
    ));
    info!(
        auth_service = %auth_client.base_url(),
        enrollment_api = %configuration.enrollment_service.api_base(),
        "Backend clients configured"
    );

    let app = build_router(
        AppState::new(auth_client, enrollment_client),
        &configuration.server,
    );

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting manager-dashboard on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
