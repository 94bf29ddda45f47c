mod commands;
mod config;
mod deck;
mod render;
mod service;

use anyhow::Result;
use config::Config;
use service::AppService;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    let app = AppService::new(config);
    app.run().await
}
