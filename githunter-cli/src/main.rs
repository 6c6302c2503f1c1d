//! GitHunter CLI
//!
//! Discovers proxy-configuration links by scanning GitHub collector
//! repositories.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use githunter_github::{check_rate_limit, GithubConfig};
use githunter_output::write_all;
use githunter_pipeline::{Pipeline, PipelineConfig};

#[derive(Parser)]
#[command(name = "githunter")]
#[command(author, version, about = "GitHunter: proxy config link discovery on GitHub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full discovery pass and write all output formats
    Hunt {
        /// GitHub personal access token (or set GITHUB_TOKEN env var)
        #[arg(long, env = "GITHUB_TOKEN")]
        token: Option<String>,

        /// Directory for generated output files
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        /// Repositories kept per search keyword
        #[arg(long, default_value = "3")]
        max_per_keyword: usize,

        /// Concurrent landing-page fetches
        #[arg(long, default_value = "5")]
        concurrency: usize,
    },

    /// Check GitHub API reachability and search quota
    Status {
        /// GitHub personal access token (or set GITHUB_TOKEN env var)
        #[arg(long, env = "GITHUB_TOKEN")]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    match cli.command {
        Commands::Hunt {
            token,
            output_dir,
            max_per_keyword,
            concurrency,
        } => {
            run_hunt(token, output_dir, max_per_keyword, concurrency).await?;
        }
        Commands::Status { token } => {
            check_status(token).await?;
        }
    }

    Ok(())
}

async fn run_hunt(
    token: Option<String>,
    output_dir: PathBuf,
    max_per_keyword: usize,
    concurrency: usize,
) -> Result<()> {
    println!("=== GitHunter Started ===");
    println!("Started at: {}", chrono::Utc::now().to_rfc3339());

    if token.is_none() {
        println!("Warning: no GitHub token set; search rate limits will be tight");
    }

    let config = PipelineConfig {
        github: GithubConfig {
            token,
            max_per_keyword,
            ..GithubConfig::default()
        },
        fetch_concurrency: concurrency,
    };

    let pipeline = Pipeline::new(config);
    let results = pipeline.run().await?;

    println!("\n=== Run Summary ===");
    println!("Repositories scanned: {}", results.summary.total_repositories);
    println!("Candidate links:      {}", results.summary.total_candidates);
    println!("Unique links:         {}", results.summary.unique_links);
    println!("High priority links:  {}", results.high_priority_urls.len());

    if !results.summary.by_protocol.is_empty() {
        println!("\nBy protocol:");
        for (category, count) in &results.summary.by_protocol {
            println!("  {:<10} {}", category.label(), count);
        }
    }

    let paths = write_all(&output_dir, &results)?;
    println!("\nGenerated {} output files:", paths.len());
    for path in paths {
        println!("  - {}", path.display());
    }

    Ok(())
}

async fn check_status(token: Option<String>) -> Result<()> {
    println!("Checking GitHub API...\n");

    let config = GithubConfig {
        token,
        ..GithubConfig::default()
    };

    match check_rate_limit(&config).await {
        Ok(Some(remaining)) => {
            println!("GitHub API reachable");
            println!("Search quota remaining: {}", remaining);
        }
        Ok(None) => {
            println!("GitHub API reachable, but no quota information returned");
        }
        Err(e) => {
            println!("GitHub API check failed: {}", e);
            println!("Tip: set GITHUB_TOKEN for authenticated access");
        }
    }

    Ok(())
}
