/// The revision span a pull request covers, as accepted by `git diff base..head`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionRange {
    /// Base commit (the target branch tip the PR was opened against)
    pub base: String,
    /// Head commit of the PR branch
    pub head: String,
}

impl std::fmt::Display for RevisionRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.base, self.head)
    }
}

/// Everything the generator sees about one pull request.
///
/// Built once per run and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrContext {
    /// PR title
    pub title: String,
    /// Author's GitHub login
    pub author: String,
    /// One `shorthash subject` line per commit, newest first
    pub commits: String,
    /// Unified diff between base and head, passed through untouched
    pub diff: String,
}
