//! Release asset download URL construction

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::warn;

use crate::config::RepoId;

/// Default host serving release downloads
pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Filename used when no `downloadFile` pattern is configured
pub const DEFAULT_FILENAME_PATTERN: &str = "${repo}-${version}.tar.gz";

/// `${name}` placeholders in a filename pattern
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(\w+)\}").unwrap());

/// Substitute `${repo}` (short repository name) and `${version}` in `pattern`.
///
/// Unknown placeholders are left untouched.
pub fn render_filename(pattern: &str, repo_name: &str, version: &str) -> String {
    PLACEHOLDER_RE
        .replace_all(pattern, |caps: &Captures| match &caps[1] {
            "repo" => repo_name.to_string(),
            "version" => version.to_string(),
            other => {
                warn!(placeholder = other, pattern, "Unknown placeholder in download filename");
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Build `<server>/<owner>/<name>/releases/download/<version>/<filename>`
pub fn download_url(
    server_url: &str,
    repo: &RepoId,
    version: &str,
    pattern: Option<&str>,
) -> String {
    let filename = render_filename(
        pattern.unwrap_or(DEFAULT_FILENAME_PATTERN),
        &repo.name,
        version,
    );

    format!(
        "{}/{}/{}/releases/download/{}/{}",
        server_url.trim_end_matches('/'),
        repo.owner,
        repo.name,
        version,
        filename
    )
}
