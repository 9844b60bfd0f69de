pub mod types;

pub use types::{PrContext, RevisionRange};

use crate::process::{CommandError, CommandLine, CommandRunner};
use tracing::{debug, instrument};

/// `git diff base..head`
pub fn diff_command(range: &RevisionRange) -> CommandLine {
    CommandLine::new("git", ["diff".to_string(), range.to_string()])
}

/// `git log --pretty=format:%h %s base..head`
pub fn log_command(range: &RevisionRange) -> CommandLine {
    CommandLine::new(
        "git",
        [
            "log".to_string(),
            "--pretty=format:%h %s".to_string(),
            range.to_string(),
        ],
    )
}

/// Gather the diff and commit log for `range` and bundle them with the PR metadata.
///
/// The diff runs first; if it fails the log is never requested.
#[instrument(skip_all, fields(range = %range))]
pub async fn collect_context(
    runner: &dyn CommandRunner,
    range: &RevisionRange,
    title: &str,
    author: &str,
) -> Result<PrContext, CommandError> {
    let diff = runner.run(&diff_command(range)).await?;
    debug!(diff_bytes = diff.len(), "collected diff");

    let commits = runner.run(&log_command(range)).await?;
    debug!(commits = commits.lines().count(), "collected commit log");

    Ok(PrContext {
        title: title.to_string(),
        author: author.to_string(),
        commits: commits.trim().to_string(),
        diff: diff.trim().to_string(),
    })
}
