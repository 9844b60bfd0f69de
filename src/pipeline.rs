use crate::config::{Config, ConfigError};
use crate::describe::{DescriptionGenerator, GenerateError};
use crate::github::{PublishError, PullRequestPublisher};
use crate::pr;
use crate::process::{CommandError, CommandRunner};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Error getting PR context: {0}")]
    Context(#[from] CommandError),

    #[error("Error generating description: {0}")]
    Generate(#[from] GenerateError),

    #[error("Error updating PR description: {0}")]
    Publish(#[from] PublishError),
}

/// Render `err` followed by every underlying cause, for the final status line.
///
/// Wrapping errors already print their immediate cause, so a cause whose text
/// is already part of the line is not repeated.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut line = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !line.contains(&text) {
            line.push_str(": ");
            line.push_str(&text);
        }
        source = cause.source();
    }
    line
}

/// What to do with the generated description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Write it to the pull request
    Publish,
    /// Hand it back to the caller without touching the pull request
    DryRun,
}

/// Collect context, generate a description, then publish it, strictly in that order.
///
/// Returns the description that was generated.
#[instrument(skip_all, fields(pr = %config.target, range = %config.revisions))]
pub async fn run(
    config: &Config,
    runner: &dyn CommandRunner,
    generator: &DescriptionGenerator,
    publisher: &PullRequestPublisher,
    mode: Mode,
) -> Result<String, RunError> {
    info!("collecting PR context");
    let context =
        pr::collect_context(runner, &config.revisions, &config.title, &config.author).await?;

    info!("generating description with Anthropic API");
    let description = generator.generate(&context).await?;

    match mode {
        Mode::Publish => {
            info!("updating PR description");
            publisher
                .update_description(&config.target, &description)
                .await?;
        }
        Mode::DryRun => info!("dry run, leaving PR description untouched"),
    }

    Ok(description)
}
