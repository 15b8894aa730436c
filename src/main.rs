use anyhow::Context;
use clap::Parser;
use paper_digest::config::ConfigOrigin;
use paper_digest::{commands, config, logger, OutputFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "paper-digest")]
#[command(version, about = "Extract the abstract of a paper and split the rest into eight segments", long_about = None)]
struct Cli {
    /// PDF, plain text or Markdown file to digest
    file: String,

    /// Output format (default: from config)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Number of keywords to extract
    #[arg(long)]
    keywords: Option<usize>,

    /// Leave the quality report out of the digest
    #[arg(long)]
    no_quality: bool,

    /// Config file to use instead of the user config
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_note) = match &cli.config {
        Some(path) => {
            let config = config::load_config_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            (config, None)
        }
        None => {
            let path = config::get_config_path().context("Failed to locate config")?;
            let (config, origin) = config::load_or_create(&path).context("Failed to load config")?;
            (config, Some((path, origin)))
        }
    };

    if let Some(format) = cli.format {
        config.output_format = format;
    }
    if let Some(count) = cli.keywords {
        anyhow::ensure!(count > 0, "--keywords must be at least 1");
        config.keyword_count = count;
    }
    if cli.no_quality {
        config.include_quality = false;
    }

    logger::init_logging(&config.log_level);
    tracing::info!("paper-digest starting...");

    match config_note {
        Some((path, ConfigOrigin::Created)) => {
            tracing::info!("Wrote default config to {}", path.display())
        }
        Some((path, ConfigOrigin::Backfilled)) => {
            tracing::info!("Added missing keys to {}", path.display())
        }
        _ => {}
    }

    let digest = commands::digest_file(&cli.file, &config)
        .await
        .with_context(|| format!("Failed to digest {}", cli.file))?;

    match config.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&digest)?),
        OutputFormat::Text => print!("{}", commands::render_text(&digest)),
    }

    Ok(())
}
