//! Tag source trait for listing the tags published by a repository

#[cfg(test)]
use mockall::automock;

use crate::config::RepoId;
use crate::version::error::RegistryError;

/// Maximum number of tags requested from a tag source in a single call
pub const MAX_TAGS_PER_REQUEST: u8 = 100;

/// Trait for fetching the raw tag names of a repository
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait TagSource: Send + Sync {
    /// Fetches up to [`MAX_TAGS_PER_REQUEST`] tag names for a repository
    ///
    /// # Arguments
    /// * `repo` - The repository to list (e.g., `gotray/got`)
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Tag names in the order the upstream provides them
    /// * `Err(RegistryError)` - If the fetch fails
    async fn fetch_tags(&self, repo: &RepoId) -> Result<Vec<String>, RegistryError>;
}
