//! Bits shared by the Anthropic and GitHub clients.

use reqwest::Client;
use std::time::Duration;

/// GitHub rejects requests without a User-Agent.
pub const USER_AGENT: &str = concat!("pr-describer/", env!("CARGO_PKG_VERSION"));

/// A client whose requests give up after `timeout_secs`.
pub fn client(timeout_secs: u64) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

/// `": <body>"` for error messages, or nothing when the body is blank.
pub fn body_suffix(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}
