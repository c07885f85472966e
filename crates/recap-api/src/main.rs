use std::sync::Arc;

use anyhow::Context;

use recap_api::{routes, server, state::AppState, telemetry};
use recap_core::Config;
use recap_db::MediaRepository;
use recap_vision::{VisionClient, VisionConfig};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let config = Config::from_env()?;

    tokio::fs::create_dir_all(&config.upload_temp_dir)
        .await
        .with_context(|| {
            format!(
                "failed to create upload temp dir {}",
                config.upload_temp_dir.display()
            )
        })?;

    let pool = recap_db::connect(&config.database_url).await?;
    let repository = MediaRepository::new(pool);

    // Missing credentials abort startup here, before the listener binds.
    let vision = VisionClient::new(VisionConfig {
        endpoint: config.vision_endpoint.clone().unwrap_or_default(),
        key: config.vision_key.clone().unwrap_or_default(),
    })
    .context("vision analysis client could not be constructed")?;

    let state = AppState::new(config.clone(), repository, Arc::new(vision))?;
    let router = routes::build_router(Arc::new(state));

    server::start_server(&config, router).await?;

    Ok(())
}
