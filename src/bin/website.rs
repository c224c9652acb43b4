use clap::Parser;
use std::path::PathBuf;

use portfolio::app;
use portfolio::config::SiteConfig;

/// Serve the portfolio locally
#[derive(Parser)]
#[command(name = "website", version)]
struct Args {
    /// Config file (defaults to ./site.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:3000
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = SiteConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    println!("Starting portfolio server for {}", config.data_path.display());
    app::run(&config).await
}
