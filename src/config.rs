use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// Repository identifier in `owner/name` form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    /// Deterministic key used to name outputs: `Owner/Name` -> `owner_name`
    pub fn output_key(&self) -> String {
        format!("{}_{}", self.owner, self.name).to_lowercase()
    }
}

impl FromStr for RepoId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidRepo(s.to_string());

        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;
        let (owner, name) = (owner.trim(), name.trim());

        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Environment variables to export for a repository
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct EnvExports {
    /// Variable receiving the resolved tag
    pub version: Option<String>,
    /// Variable receiving the computed download URL
    #[serde(rename = "downloadURL", alias = "download_url", alias = "downloadUrl")]
    pub download_url: Option<String>,
}

/// Repository entry as written in the configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
struct RepoEntry {
    repo: String,
    version: String,
    #[serde(default, alias = "varName")]
    var_name: Option<String>,
    #[serde(default, rename = "downloadFile", alias = "download_file")]
    download_file: Option<String>,
    #[serde(default)]
    env: EnvExports,
}

/// A list or a lone mapping; both are accepted
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Entries {
    Many(Vec<RepoEntry>),
    One(RepoEntry),
}

/// One repository to resolve, validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRequest {
    pub repo: RepoId,
    /// Constraint string exactly as configured
    pub constraint: String,
    pub var_name: Option<String>,
    /// Download filename pattern with `${repo}` / `${version}` placeholders
    pub download_file: Option<String>,
    pub env: EnvExports,
}

impl RepositoryRequest {
    pub fn new(repo: &str, constraint: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            repo: repo.parse()?,
            constraint: constraint.to_string(),
            var_name: None,
            download_file: None,
            env: EnvExports::default(),
        })
    }
}

impl TryFrom<RepoEntry> for RepositoryRequest {
    type Error = ConfigError;

    fn try_from(entry: RepoEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            repo: entry.repo.parse()?,
            constraint: entry.version,
            var_name: entry.var_name.filter(|v| !v.trim().is_empty()),
            download_file: entry.download_file.filter(|v| !v.trim().is_empty()),
            env: entry.env,
        })
    }
}

/// Parse the configured repository list.
///
/// Accepts a YAML (or JSON) list of entries, a single entry, or one JSON
/// object per line.
pub fn parse_repositories(input: &str) -> Result<Vec<RepositoryRequest>, ConfigError> {
    if input.trim().is_empty() {
        return Err(ConfigError::Missing);
    }

    let entries = if is_json_lines(input) {
        // A single YAML flow mapping (`{repo: a/b, version: v1}`) looks the same
        match parse_json_lines(input) {
            Ok(entries) => entries,
            Err(json_error) => parse_yaml(input).map_err(|_| json_error)?,
        }
    } else {
        parse_yaml(input)?
    };

    if entries.is_empty() {
        return Err(ConfigError::Missing);
    }

    entries.into_iter().map(RepositoryRequest::try_from).collect()
}

fn parse_yaml(input: &str) -> Result<Vec<RepoEntry>, ConfigError> {
    Ok(match serde_yaml::from_str::<Entries>(input)? {
        Entries::Many(entries) => entries,
        Entries::One(entry) => vec![entry],
    })
}

fn is_json_lines(input: &str) -> bool {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .all(|line| line.starts_with('{') && line.ends_with('}'))
}

fn parse_json_lines(input: &str) -> Result<Vec<RepoEntry>, ConfigError> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line.trim()).map_err(|source| ConfigError::JsonLine {
                line: index + 1,
                source,
            })
        })
        .collect()
}
