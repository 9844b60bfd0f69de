use crate::pr::PrContext;

const INSTRUCTIONS: &str = "\
Read the pull request context below and write a clear, concise PR description.

Return ONLY the PR description content in GitHub Markdown format - no meta-commentary, \
no explanations about what you did, just the actual description that will become the PR body.

Structure the description with:
## Summary
Brief overview of what this PR does

## Changes Made
- Key changes in bullet points

## Impact
What this improves or fixes";

/// Compose the single user prompt for `ctx`.
///
/// Title, author, commits and diff are embedded verbatim.
pub fn build_prompt(ctx: &PrContext) -> String {
    format!(
        "{INSTRUCTIONS}\n\n\
         Pull Request Title: {title}\n\
         Author: {author}\n\n\
         Commit Messages:\n{commits}\n\n\
         Complete Code Diff:\n{diff}",
        title = ctx.title,
        author = ctx.author,
        commits = ctx.commits,
        diff = ctx.diff,
    )
}
