//! Tag source test utilities

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempDir;

use semver_match::config::RepoId;
use semver_match::output::publisher::Publisher;
use semver_match::output::sink::FileCommandSink;
use semver_match::version::error::RegistryError;
use semver_match::version::registry::TagSource;

/// Mock tag source for testing
pub struct MockTagSource {
    tags: HashMap<String, Vec<String>>,
    failures: HashMap<String, String>,
}

impl MockTagSource {
    pub fn new() -> Self {
        Self {
            tags: HashMap::new(),
            failures: HashMap::new(),
        }
    }

    pub fn with_tags(mut self, repo: &str, tags: Vec<&str>) -> Self {
        self.tags.insert(
            repo.to_string(),
            tags.into_iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    /// Make fetching `repo` fail with an invalid response carrying `message`
    pub fn with_failure(mut self, repo: &str, message: &str) -> Self {
        self.failures.insert(repo.to_string(), message.to_string());
        self
    }
}

#[async_trait]
impl TagSource for MockTagSource {
    async fn fetch_tags(&self, repo: &RepoId) -> Result<Vec<String>, RegistryError> {
        let key = repo.to_string();
        if let Some(message) = self.failures.get(&key) {
            return Err(RegistryError::InvalidResponse(message.clone()));
        }
        match self.tags.get(&key) {
            Some(tags) => Ok(tags.clone()),
            None => Err(RegistryError::NotFound(key)),
        }
    }
}

/// Output and environment files of a simulated workflow step
pub struct StepFiles {
    _temp_dir: TempDir,
    pub output: PathBuf,
    pub env: PathBuf,
}

impl StepFiles {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("github_output");
        let env = temp_dir.path().join("github_env");
        Self {
            _temp_dir: temp_dir,
            output,
            env,
        }
    }

    /// Publisher appending to both files
    pub fn publisher(
        &self,
        server_url: &str,
    ) -> Publisher<FileCommandSink<fs::File>, FileCommandSink<fs::File>> {
        Publisher::new(
            FileCommandSink::append(&self.output, "output").unwrap(),
            FileCommandSink::append(&self.env, "environment variable").unwrap(),
            server_url,
        )
    }

    pub fn outputs(&self) -> String {
        read_or_empty(&self.output)
    }

    pub fn env(&self) -> String {
        read_or_empty(&self.env)
    }
}

fn read_or_empty(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}
