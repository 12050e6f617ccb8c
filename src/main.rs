use huddle::{build_router, load_dotenv, AppError, AppState, ServerConfig};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "huddle=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server stopped with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AppError> {
    load_dotenv();
    let config = ServerConfig::from_env()?;
    info!(host = %config.host, port = config.port, "Starting huddle room server");

    let app = build_router(AppState::in_memory());

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|source| AppError::Bind {
            address: address.clone(),
            source,
        })?;
    info!("Server listening on {}", address);

    axum::serve(listener, app).await.map_err(AppError::Serve)
}
