//! Error taxonomy for a resolution run
//!
//! - [`ConfigError`]: the repository list is missing or malformed (fatal before any fetch)
//! - [`RepoError`]: one repository failed to fetch, parse or match
//! - [`PublishError`]: an output or environment entry could not be written (always fatal)
//! - [`RunError`]: the single failure reported for the whole run

use std::path::PathBuf;

use thiserror::Error;

use crate::version::error::{ConstraintError, RegistryError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no repositories configured")]
    Missing,

    #[error("failed to parse repository list: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse repository entry on line {line}: {source}")]
    JsonLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid repository `{0}`: expected owner/name")]
    InvalidRepo(String),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Failed to fetch tags from {repo}: {source}")]
    Fetch {
        repo: String,
        #[source]
        source: RegistryError,
    },

    #[error("No matching version found for {repo} with constraint {constraint}")]
    NoMatch { repo: String, constraint: String },

    #[error("Invalid version constraint {constraint} for {repo}: {source}")]
    InvalidConstraint {
        repo: String,
        constraint: String,
        #[source]
        source: ConstraintError,
    },
}

impl RepoError {
    /// Repository the failure is attributed to
    pub fn repo(&self) -> &str {
        match self {
            RepoError::Fetch { repo, .. }
            | RepoError::NoMatch { repo, .. }
            | RepoError::InvalidConstraint { repo, .. } => repo,
        }
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to write to {target}: {source}")]
    Io {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {kind} name `{name}`")]
    InvalidName { kind: &'static str, name: String },

    #[error("failed to serialize aggregate output: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("{}", join_failures(.0))]
    Failed(Vec<RepoError>),
}

fn join_failures(failures: &[RepoError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
