use anyhow::Result;
use page_audit::cli::CliInterface;
use page_audit::config::AppConfig;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load_or_default(config_path.as_deref())?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level()?)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut cli = CliInterface::new(config)?;
    cli.run().await
}
