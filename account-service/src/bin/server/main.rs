use account_service::application::Application;
use account_service::config::Config;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        jwt_expiration_hours = config.jwt.expiration_hours,
        max_connections = config.database.max_connections,
        "Configuration loaded"
    );

    let application = Application::build(&config).await?;
    tracing::info!("Account service ready");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    application.shutdown().await;

    Ok(())
}
