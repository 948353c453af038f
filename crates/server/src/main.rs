use clap::Parser;
use tracing_subscriber::EnvFilter;

use doclift_server::cli::{Cli, Command};
use doclift_server::{setup, startup};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    doclift_core::config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = doclift_core::Config::for_profile(&cli.profile);
    config.log_summary();

    match cli.command() {
        Command::Serve => startup::serve(&config).await,
        Command::InitCollection { keep_existing } => {
            setup::run(&config.weaviate, keep_existing).await?;
            Ok(())
        }
    }
}
