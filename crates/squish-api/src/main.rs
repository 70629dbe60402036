use squish_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    squish_api::telemetry::init_telemetry();

    let state = squish_api::state::AppState::new(config.clone()).await?;
    let app = squish_api::setup::routes::setup_routes(state);

    squish_api::setup::server::start_server(&config, app).await?;

    Ok(())
}
