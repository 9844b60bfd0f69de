use crate::config::{GitHubSettings, PullRequestTarget, Secret};
use crate::http::{self, body_suffix};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("GitHub API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub API error: {status}{}", body_suffix(.body))]
    Status { status: StatusCode, body: String },
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    body: &'a str,
}

/// Writes descriptions back to pull requests through the GitHub REST API.
pub struct PullRequestPublisher {
    client: Client,
    base_url: String,
    token: Secret,
}

impl PullRequestPublisher {
    pub fn new(settings: &GitHubSettings, token: Secret) -> Result<Self, PublishError> {
        Ok(Self {
            client: http::client(settings.timeout_secs)?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn pull_url(&self, target: &PullRequestTarget) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_url, target.owner, target.repo, target.number
        )
    }

    /// Replace the body of `target` with `description`.
    #[instrument(skip(self, description), fields(pr = %target))]
    pub async fn update_description(
        &self,
        target: &PullRequestTarget,
        description: &str,
    ) -> Result<(), PublishError> {
        debug!(body_bytes = description.len(), "patching PR body");
        let response = self
            .client
            .patch(self.pull_url(target))
            .bearer_auth(self.token.expose())
            .header(reqwest::header::ACCEPT, GITHUB_ACCEPT)
            .json(&UpdateBody { body: description })
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "received GitHub response");
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(PublishError::Status { status, body })
        }
    }
}
