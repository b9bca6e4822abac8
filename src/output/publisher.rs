//! Publishing of resolved versions to output and environment sinks

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::config::RepositoryRequest;
use crate::error::PublishError;
use crate::output::download::download_url;
use crate::output::sink::Sink;

/// Output holding the JSON mapping of every resolved repository
pub const AGGREGATE_OUTPUT: &str = "matched_versions";

/// Values published for one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub version: String,
    pub download_url: String,
}

/// Writes resolved versions to a step-output sink and an environment sink
pub struct Publisher<O: Sink, E: Sink> {
    outputs: O,
    env: E,
    server_url: String,
}

impl<O: Sink, E: Sink> Publisher<O, E> {
    pub fn new(outputs: O, env: E, server_url: &str) -> Self {
        Self {
            outputs,
            env,
            server_url: server_url.to_string(),
        }
    }

    /// Publish the resolved `version` for `request`
    ///
    /// Outputs `<key>_version` and `<key>_download_url`; environment variables
    /// are exported only when the request names them.
    pub fn publish(
        &mut self,
        request: &RepositoryRequest,
        version: &str,
    ) -> Result<Published, PublishError> {
        let key = request.repo.output_key();
        let url = download_url(
            &self.server_url,
            &request.repo,
            version,
            request.download_file.as_deref(),
        );

        self.outputs.write_entry(&format!("{key}_version"), version)?;
        self.outputs.write_entry(&format!("{key}_download_url"), &url)?;

        let exports = [
            (request.var_name.as_deref(), version),
            (request.env.version.as_deref(), version),
            (request.env.download_url.as_deref(), url.as_str()),
        ];
        for (name, value) in exports {
            if let Some(name) = name {
                debug!(name, value, "Exporting environment variable");
                self.env.write_entry(name, value)?;
            }
        }

        info!(repo = %request.repo, version, "Published resolved version");

        Ok(Published {
            version: version.to_string(),
            download_url: url,
        })
    }

    /// Publish the `repo -> version` mapping as a single JSON output
    pub fn publish_aggregate(
        &mut self,
        versions: &IndexMap<String, String>,
    ) -> Result<(), PublishError> {
        let json = serde_json::to_string(versions)?;
        self.outputs.write_entry(AGGREGATE_OUTPUT, &json)
    }

    pub fn into_sinks(self) -> (O, E) {
        (self.outputs, self.env)
    }
}
