use anyhow::{Context, Result};
use log::info;
use simple_logger::SimpleLogger;

use ray_casting::{
    app::App,
    config::{AppConfig, CONFIG_FILE},
};

fn main() -> Result<()> {
    let config = AppConfig::load(CONFIG_FILE)
        .with_context(|| format!("Failed to load {}", CONFIG_FILE))?;

    SimpleLogger::new().with_level(config.log_level()?).init()?;
    info!("Initializing application...");

    let (app, event_loop) = App::new(&config)?;
    app.run(event_loop)
}
