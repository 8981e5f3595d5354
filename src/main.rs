use anyhow::Result;
use quiz_master_kh::utils::logging;
use quiz_master_kh::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging first, everything else reports through it
    logging::init();

    // Defaults ← config.toml ← environment
    let config = Config::load();

    // Run one session until ctrl-c
    App::initialize(config).await?.run().await?;

    Ok(())
}
