//! CLI entry point for the citeset tool.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use citeset_core::{
    CitationPipeline, ContentFetcher, HttpClient, RobotsChecker, ScraperConfig, WikiClient,
    write_summaries,
};
use tracing::{debug, error, info};

mod app_config;
mod cli;

use app_config::{FileConfig, load_default_file_config};
use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let file_config = load_default_file_config()?;

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config file > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => file_config.verbosity.map_or("info", |v| v.level()),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, ?file_config, "CLI arguments parsed");

    let titles = read_titles(&args)?;
    if titles.is_empty() {
        info!("No titles provided. Pass article titles as arguments or pipe them via stdin.");
        info!("Example: echo 'Radiohead' | citeset -o data");
        return Ok(());
    }

    let config = build_config(&args, &file_config);
    config.validate()?;
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| file_config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    tokio::fs::create_dir_all(&output_dir)
        .await
        .with_context(|| format!("Failed to create output directory '{}'", output_dir.display()))?;

    let client = HttpClient::new(&config)?;
    let robots = RobotsChecker::new(client.clone(), config.robots_agent.clone());
    let wiki = WikiClient::with_base_url(client.clone(), config.api_url.clone());
    debug!(api_url = %wiki.base_url(), robots_agent = %config.robots_agent, "Clients ready");
    let pipeline = CitationPipeline::new(wiki, ContentFetcher::new(client, robots));

    info!(titles = titles.len(), "Citeset starting");

    let mut failed = 0usize;
    for title in &titles {
        let report = match pipeline.run(title).await {
            Ok(report) => report,
            Err(e) => {
                error!(title = %title, error = %e, "Failed to process article");
                failed += 1;
                continue;
            }
        };

        match write_summaries(&output_dir, title, &report.summaries).await {
            Ok(path) => info!(
                title = %title,
                summaries = report.summaries.len(),
                skipped = report.skipped.len(),
                path = %path.display(),
                "Article written"
            ),
            Err(e) => {
                error!(title = %title, error = %e, "Failed to write summaries");
                failed += 1;
            }
        }
    }

    info!(
        succeeded = titles.len() - failed,
        failed,
        total = titles.len(),
        "Run complete"
    );

    if failed == titles.len() {
        bail!("All {failed} article(s) failed");
    }
    Ok(())
}

/// Titles from positional arguments, or one per line from piped stdin.
fn read_titles(args: &Args) -> Result<Vec<String>> {
    let raw = if !args.titles.is_empty() {
        args.titles.clone()
    } else if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer.lines().map(str::to_string).collect()
    } else {
        Vec::new()
    };

    Ok(raw
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect())
}

/// Layers CLI flags over the config file over built-in defaults.
fn build_config(args: &Args, file: &FileConfig) -> ScraperConfig {
    let defaults = ScraperConfig::default();
    ScraperConfig {
        timeout: args
            .timeout
            .or(file.timeout_secs)
            .map_or(defaults.timeout, Duration::from_secs),
        user_agent: args
            .user_agent
            .clone()
            .or_else(|| file.user_agent.clone())
            .unwrap_or(defaults.user_agent),
        robots_agent: args
            .robots_agent
            .clone()
            .or_else(|| file.robots_agent.clone())
            .unwrap_or(defaults.robots_agent),
        api_url: args
            .api_url
            .clone()
            .or_else(|| file.api_url.clone())
            .unwrap_or(defaults.api_url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_defaults() {
        let args = Args::try_parse_from(["citeset"]).unwrap();
        let config = build_config(&args, &FileConfig::default());
        assert_eq!(config, ScraperConfig::default());
    }

    #[test]
    fn test_build_config_cli_overrides_file() {
        let args = Args::try_parse_from(["citeset", "-t", "5", "--robots-agent", "cli-bot"]).unwrap();
        let file = FileConfig {
            timeout_secs: Some(20),
            robots_agent: Some("file-bot".to_string()),
            api_url: Some("http://localhost/api.php".to_string()),
            ..FileConfig::default()
        };

        let config = build_config(&args, &file);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.robots_agent, "cli-bot");
        assert_eq!(config.api_url, "http://localhost/api.php");
        assert_eq!(config.user_agent, ScraperConfig::default().user_agent);
    }

    #[test]
    fn test_read_titles_trims_and_drops_blank_args() {
        let args = Args::try_parse_from(["citeset", " Radiohead ", "", "Kid A"]).unwrap();
        assert_eq!(read_titles(&args).unwrap(), vec!["Radiohead", "Kid A"]);
    }
}
