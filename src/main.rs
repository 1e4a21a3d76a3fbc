use repository_template::config::ServerConfig;
use repository_template::server;
use std::process::ExitCode;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    info!(port = %config.port, "Starting health server");

    // The lifecycle logs the fatal error itself
    if server::run(&config).await.is_err() {
        return ExitCode::FAILURE;
    }

    info!("Server exited");
    ExitCode::SUCCESS
}
