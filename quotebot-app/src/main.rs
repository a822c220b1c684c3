use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use quotebot_common::observability::init_logging;
use quotebot_config::{DEFAULT_CONFIG_FILE, QuotebotConfig, QuotebotConfigLoader};
use quotebot_core::{QuoteBot, prepare};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
mod wiring;

/// Post one random, not-yet-posted quote from a spreadsheet to Twitter/X.
#[derive(Debug, Parser)]
#[command(name = "quotebot", version)]
struct Cli {
    /// YAML configuration; a missing file means env-only configuration.
    #[arg(long, env = "QUOTEBOT_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Pick and format a quote, print it, and stop before publishing.
    #[arg(long)]
    dry_run: bool,

    /// Read rows from a JSON array of objects instead of the sheet.
    #[arg(long, value_name = "JSON")]
    rows_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging is configured from the file, so failures here only reach stderr.
    let cfg = match QuotebotConfigLoader::new()
        .with_optional_file(&cli.config)
        .load()
    {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("quotebot: invalid configuration ({}): {e}", cli.config.display());
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_logging(wiring::log_config(&cfg.logging)) {
        eprintln!("quotebot: logging setup failed: {e:#}");
        return ExitCode::FAILURE;
    }

    tracing::info!("=== quotebot starting ===");
    tracing::info!("Execution time: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    match run(&cli, &cfg).await {
        Ok(()) => {
            tracing::info!("=== run completed ===");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "=== run failed ===");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, cfg: &QuotebotConfig) -> Result<()> {
    let source = wiring::build_source(cfg, cli.rows_file.as_deref())?;
    let format = wiring::format_options(&cfg.tweet);

    if cli.dry_run {
        let mut rng = StdRng::from_entropy();
        let prepared = prepare(source.as_ref(), &format, &mut rng)
            .await
            .context("preparing tweet")?;
        tracing::info!(
            row = prepared.record.source_row,
            chars = prepared.text.chars().count(),
            "Dry run, not publishing: {}",
            prepared.text
        );
        println!("{}", prepared.text);
        return Ok(());
    }

    let twitter = wiring::build_poster(cfg)?;
    twitter.verify_credentials().await?;

    let report = QuoteBot::new(source, Arc::new(twitter))
        .with_format(format)
        .run()
        .await?;
    tracing::info!(
        post_id = %report.post_id,
        row = report.source_row,
        marked_posted = report.marked_posted,
        pool_exhausted = report.pool_exhausted,
        "Quote published"
    );
    Ok(())
}
