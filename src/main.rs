//! MentorWeb scheduling core
//!
//! Main application entry point

use std::time::Duration;
use anyhow::Context;
use tracing::{info, warn, error};

use MentorWeb::{
    config::Settings,
    utils::logging,
    database::{DatabaseService, connection::{create_pool, run_migrations, DatabaseConfig}},
    services::ServiceFactory,
};

const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate().context("invalid configuration")?;

    // Initialize logging; the guard keeps the file writer alive
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", MentorWeb::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&DatabaseConfig::from(&settings.database))
        .await
        .context("failed to connect to database")?;

    run_migrations(&db_pool).await.context("failed to run migrations")?;

    let database_service = DatabaseService::new(db_pool);

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(&settings, database_service)?;

    let status = services.health_check().await;
    for issue in status.get_issues() {
        warn!(issue = %issue, "Service health issue");
    }

    info!(
        notifications_enabled = status.notifications_enabled,
        utc_offset_minutes = settings.scheduling.utc_offset_minutes,
        "MentorWeb is ready"
    );

    let mut ticker = tokio::time::interval(HEALTH_CHECK_INTERVAL);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
            _ = ticker.tick() => {
                let status = services.health_check().await;
                if !status.is_healthy() {
                    error!(issues = ?status.get_issues(), "Health check failed");
                }
            }
        }
    }

    info!("MentorWeb has been shut down.");
    Ok(())
}
