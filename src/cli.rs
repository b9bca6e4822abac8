//! Command line and environment configuration
//!
//! Every option falls back to the environment variable GitHub Actions sets
//! for it, so the binary runs unchanged as an action step or locally.

use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{Parser, ValueEnum};

use crate::config::{RepositoryRequest, parse_repositories};
use crate::error::ConfigError;
use crate::output::download::DEFAULT_SERVER_URL;
use crate::runner::FailurePolicy;
use crate::version::registries::github::DEFAULT_API_URL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "semver-match")]
#[command(
    version,
    about = "Resolve the repository tag that best satisfies a version constraint"
)]
pub struct Cli {
    /// Repository list as YAML/JSON, or one JSON object per line
    #[arg(
        long,
        env = "INPUT_REPOS",
        conflicts_with = "repos_file",
        allow_hyphen_values = true
    )]
    pub repos: Option<String>,

    /// Read the repository list from a file
    #[arg(long, value_name = "PATH")]
    pub repos_file: Option<PathBuf>,

    /// Access token for the tag API (falls back to GITHUB_TOKEN)
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Base URL used to build release download URLs
    #[arg(long, env = "GITHUB_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// File receiving step outputs (stdout when unset)
    #[arg(long, env = "GITHUB_OUTPUT", value_name = "PATH")]
    pub github_output: Option<PathBuf>,

    /// File receiving exported environment variables (stdout when unset)
    #[arg(long, env = "GITHUB_ENV", value_name = "PATH")]
    pub github_env: Option<PathBuf>,

    /// Stop at the first repository that fails instead of resolving the rest
    ///
    /// Empty and falsey values (`0`, `false`, `no`, `off`) leave it disabled.
    #[arg(long, env = "INPUT_FAIL_FAST", value_parser = FalseyValueParser::new())]
    pub fail_fast: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Load and validate the configured repositories
    pub fn repositories(&self) -> Result<Vec<RepositoryRequest>, ConfigError> {
        let input = match (&self.repos, &self.repos_file) {
            (Some(repos), _) => repos.clone(),
            (None, Some(path)) => {
                std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?
            }
            (None, None) => return Err(ConfigError::Missing),
        };

        parse_repositories(&input)
    }

    /// The credential to hand to the tag source
    ///
    /// An explicit `--token` wins over `fallback` (normally `GITHUB_TOKEN`);
    /// empty values count as absent.
    pub fn credential(&self, fallback: Option<String>) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or(fallback.filter(|t| !t.is_empty()))
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        if self.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::ContinueOnError
        }
    }
}
