mod config;
mod describe;
mod github;
mod http;
mod pipeline;
mod pr;
mod process;

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pipeline::{Mode, RunError};

/// PR Describer — drafts a GitHub Pull Request description from the PR's diff
/// and commit log with Claude, then writes it back as the PR body.
///
/// Reads ANTHROPIC_API_KEY, GITHUB_TOKEN, PR_NUMBER, REPO_OWNER, REPO_NAME,
/// BASE_SHA, HEAD_SHA, PR_TITLE and PR_AUTHOR from the environment.
#[derive(Parser, Debug)]
#[command(name = "pr-describer", version, about)]
struct Cli {
    /// Settings file (defaults to .pr-describer.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the generated description instead of updating the PR
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match execute(&cli).await {
        Ok(()) => {
            eprintln!("{} PR description generation complete", "✓".green().bold());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), pipeline::error_chain(&err));
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: &Cli) -> Result<(), RunError> {
    info!("loading configuration");
    let config = config::Config::load(cli.config.as_deref())?;

    let generator = describe::DescriptionGenerator::new(
        &config.settings.anthropic,
        config.anthropic_api_key.clone(),
    )?;
    let publisher =
        github::PullRequestPublisher::new(&config.settings.github, config.github_token.clone())?;

    let mode = if cli.dry_run {
        Mode::DryRun
    } else {
        Mode::Publish
    };

    let description =
        pipeline::run(&config, &process::SystemRunner, &generator, &publisher, mode).await?;

    if mode == Mode::DryRun {
        println!("{description}");
    } else {
        info!(pr = %config.target, "PR description updated successfully");
    }

    Ok(())
}
