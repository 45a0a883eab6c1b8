//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Build citation datasets from wiki articles.
///
/// Citeset extracts cited sentences from each article, fetches the cited
/// pages (honoring robots.txt) and writes `<title>.json` with one
/// `{sentence, source}` record per readable citation.
#[derive(Parser, Debug)]
#[command(name = "citeset")]
#[command(author, version, about)]
pub struct Args {
    /// Article titles to process (reads one per line from stdin if omitted)
    pub titles: Vec<String>,

    /// Directory for the per-article JSON files [default: .]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Per-request timeout in seconds (1-30) [default: 30]
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..=30))]
    pub timeout: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Agent name matched against robots.txt groups [default: *]
    #[arg(long)]
    pub robots_agent: Option<String>,

    /// Article-source API endpoint
    #[arg(long)]
    pub api_url: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
