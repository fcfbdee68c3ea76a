use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use visawiz::config::{self, Config};

#[derive(Parser)]
#[command(name = "visawiz")]
#[command(about = "Multi-step visa application and payment client")]
struct Cli {
    /// Backend API base URL
    #[arg(long, value_name = "URL", default_value = config::DEFAULT_API_URL)]
    api_url: String,

    /// Path to the wizard progress cache file
    #[arg(long, value_name = "FILE")]
    cache_file: Option<PathBuf>,

    /// Return URL from the checkout provider (opens the payment status view)
    #[arg(long, value_name = "URL")]
    return_url: Option<String>,

    /// Automatic status polls before requiring a manual check
    #[arg(long, default_value_t = config::DEFAULT_POLL_RETRIES)]
    poll_retries: u8,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose {
        "visawiz=debug"
    } else {
        "visawiz=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = Config::default();
    config.api_base_url = args.api_url;
    config.poll_retries = args.poll_retries;
    if let Some(cache_file) = args.cache_file {
        config.cache_path = cache_file;
    }

    run(config, args.return_url)
}

#[cfg(feature = "gui")]
fn run(config: Config, return_url: Option<String>) -> anyhow::Result<()> {
    visawiz::gui::run(config, return_url).map_err(|e| anyhow::anyhow!("gui failed: {e}"))
}

#[cfg(not(feature = "gui"))]
fn run(_config: Config, _return_url: Option<String>) -> anyhow::Result<()> {
    anyhow::bail!("visawiz was built without the gui feature")
}
