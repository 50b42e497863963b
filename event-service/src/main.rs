use log::{debug, error, info};
use rsvp_event_service::{config::ServiceConfig, routes::create_router};
use rsvp_shared::auth::set_jwt_secret;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Logging initialized with env_logger");
    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env file loaded: {}", e),
    }
    info!("Starting Event Service");

    let config = ServiceConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;
    set_jwt_secret(config.backend.jwt_secret.clone());

    let app = create_router(&config);

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
