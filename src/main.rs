use clap::{Parser, Subcommand};
use std::path::PathBuf;

use portfolio::config::SiteConfig;
use portfolio::data::{load_portfolio, save_portfolio};
use portfolio::export::export_site;
use portfolio::render::SiteRenderer;
use portfolio::scholar::import_publications;

#[derive(Parser)]
#[command(name = "portfolio", version, about = "Build the portfolio site from its data file")]
struct Cli {
    /// Config file (defaults to ./site.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Portfolio data file, overriding the config
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every page and write the static site
    Export {
        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,

        /// Prefix for every internal link, e.g. /my-site
        #[arg(long)]
        base_path: Option<String>,
    },
    /// Replace the publications with normalized rows from a JSON file
    ImportPublications {
        /// JSON array of scraped publication rows
        rows: PathBuf,
    },
    /// Validate the data file and render every page without writing
    Check,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = SiteConfig::load(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    match cli.command {
        Command::Export { out, base_path } => {
            if let Some(out) = out {
                config.out_dir = out;
            }
            if let Some(base_path) = base_path {
                config.set_base_path(&base_path);
            }
            let portfolio = load_portfolio(&config.data_path)?;
            let renderer = renderer(&config)?;
            let report = export_site(&portfolio, &renderer, &config.out_dir, &config.static_dir)?;
            println!(
                "Exported {} pages to {}",
                report.pages.len(),
                report.out_dir.display()
            );
        }
        Command::ImportPublications { rows } => {
            let mut portfolio = load_portfolio(&config.data_path)?;
            let count = import_publications(&mut portfolio, &rows)?;
            portfolio.validate()?;
            save_portfolio(&portfolio, &config.data_path)?;
            println!(
                "Imported {} publications into {}",
                count,
                config.data_path.display()
            );
        }
        Command::Check => {
            let portfolio = load_portfolio(&config.data_path)?;
            renderer(&config)?.render_site(&portfolio)?;
            println!("{} is valid", config.data_path.display());
        }
    }

    Ok(())
}

fn renderer(config: &SiteConfig) -> portfolio::SiteResult<SiteRenderer> {
    match &config.templates_dir {
        Some(dir) => SiteRenderer::with_templates_dir(config.render_options(), dir),
        None => SiteRenderer::new(config.render_options()),
    }
}
