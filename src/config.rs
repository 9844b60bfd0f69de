use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::pr::RevisionRange;

/// Settings file looked up in the working directory when `--config` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = ".pr-describer.toml";

const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_ANTHROPIC_URL: &str = "https://api.anthropic.com";
const DEFAULT_ANTHROPIC_TIMEOUT_SECS: u64 = 120;
const DEFAULT_GITHUB_URL: &str = "https://api.github.com";
const DEFAULT_GITHUB_TIMEOUT_SECS: u64 = 30;

/// Variables describing the pull request, checked together after the credentials.
const PR_VARIABLES: [&str; 7] = [
    "PR_NUMBER",
    "REPO_OWNER",
    "REPO_NAME",
    "BASE_SHA",
    "HEAD_SHA",
    "PR_TITLE",
    "PR_AUTHOR",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ANTHROPIC_API_KEY environment variable is required")]
    MissingApiKey,

    #[error("GITHUB_TOKEN environment variable is required")]
    MissingToken,

    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),

    #[error("PR_NUMBER must be a positive integer, got {0:?}")]
    InvalidPrNumber(String),

    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Optional tuning read from `.pr-describer.toml`.
///
/// All fields are optional, the tool works with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub anthropic: AnthropicSettings,

    #[serde(default)]
    pub github: GitHubSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnthropicSettings {
    /// Model identifier sent with every generation request
    pub model: String,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// API root, without the `/v1/messages` suffix
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for AnthropicSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            base_url: DEFAULT_ANTHROPIC_URL.to_string(),
            timeout_secs: DEFAULT_ANTHROPIC_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubSettings {
    /// REST API root (GitHub Enterprise uses `https://host/api/v3`)
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GITHUB_URL.to_string(),
            timeout_secs: DEFAULT_GITHUB_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from [`DEFAULT_SETTINGS_FILE`] when no path is given.
    ///
    /// A missing default file yields defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Path::new(DEFAULT_SETTINGS_FILE);
                if path.exists() {
                    Self::load_from(path)
                } else {
                    Ok(Settings::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Settings, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let settings = toml::from_str(&contents)?;
        Ok(settings)
    }
}

/// A credential string that never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Coordinates of the pull request whose body gets rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestTarget {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl fmt::Display for PullRequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Everything one run needs, captured once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub anthropic_api_key: Secret,
    pub github_token: Secret,
    pub target: PullRequestTarget,
    pub revisions: RevisionRange,
    pub title: String,
    pub author: String,
}

impl Config {
    /// Load settings from disk and the required values from the process environment.
    pub fn load(settings_path: Option<&Path>) -> Result<Config, ConfigError> {
        let settings = Settings::load(settings_path)?;
        Self::from_lookup(settings, |name| std::env::var(name).ok())
    }

    /// Build a config from `settings` and a variable lookup.
    ///
    /// Unset, empty and whitespace-only values are all treated as missing.
    pub fn from_lookup<F>(settings: Settings, lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let anthropic_api_key = get("ANTHROPIC_API_KEY").ok_or(ConfigError::MissingApiKey)?;
        let github_token = get("GITHUB_TOKEN").ok_or(ConfigError::MissingToken)?;

        let missing: Vec<&'static str> = PR_VARIABLES
            .iter()
            .copied()
            .filter(|name| get(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }
        let required =
            |name: &'static str| get(name).ok_or(ConfigError::MissingVariables(vec![name]));

        let raw_number = required("PR_NUMBER")?;
        let number = raw_number
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::InvalidPrNumber(raw_number))?;

        Ok(Config {
            settings,
            anthropic_api_key: Secret(anthropic_api_key),
            github_token: Secret(github_token),
            target: PullRequestTarget {
                owner: required("REPO_OWNER")?,
                repo: required("REPO_NAME")?,
                number,
            },
            revisions: RevisionRange {
                base: required("BASE_SHA")?,
                head: required("HEAD_SHA")?,
            },
            title: required("PR_TITLE")?,
            author: required("PR_AUTHOR")?,
        })
    }
}
