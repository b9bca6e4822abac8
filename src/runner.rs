//! Sequential resolution of every configured repository

use indexmap::IndexMap;
use tracing::{debug, error, info};

use crate::config::RepositoryRequest;
use crate::error::{RepoError, RunError};
use crate::output::publisher::Publisher;
use crate::output::sink::Sink;
use crate::version::constraint::Constraint;
use crate::version::registry::TagSource;
use crate::version::resolver::{MatchResult, resolve};

/// What happens to the run when one repository fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Keep resolving the remaining repositories, publish the aggregate
    /// mapping, then fail if anything failed
    #[default]
    ContinueOnError,
    /// Stop at the first failing repository; no aggregate output
    FailFast,
}

/// Result of a run in which every repository resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// `owner/name` -> resolved tag, in configuration order
    pub resolved: IndexMap<String, String>,
}

/// Fetch the tags of one repository and select the best match
///
/// The constraint is validated before any network call.
pub async fn resolve_repository<T: TagSource + ?Sized>(
    source: &T,
    request: &RepositoryRequest,
) -> Result<String, RepoError> {
    let repo = request.repo.to_string();

    let constraint =
        Constraint::parse(&request.constraint).map_err(|source| RepoError::InvalidConstraint {
            repo: repo.clone(),
            constraint: request.constraint.clone(),
            source,
        })?;

    let tags = source
        .fetch_tags(&request.repo)
        .await
        .map_err(|source| RepoError::Fetch {
            repo: repo.clone(),
            source,
        })?;

    debug!(repo = %repo, tags = tags.len(), constraint = %request.constraint, "Resolving");

    match resolve(&tags, &constraint) {
        MatchResult::Matched(tag) => Ok(tag),
        MatchResult::NoMatch => Err(RepoError::NoMatch {
            repo,
            constraint: request.constraint.clone(),
        }),
    }
}

/// Resolve and publish every request, strictly one at a time in order
pub async fn run<T, O, E>(
    source: &T,
    requests: &[RepositoryRequest],
    publisher: &mut Publisher<O, E>,
    policy: FailurePolicy,
) -> Result<RunSummary, RunError>
where
    T: TagSource + ?Sized,
    O: Sink,
    E: Sink,
{
    let mut summary = RunSummary::default();
    let mut failures = Vec::new();

    for request in requests {
        match resolve_repository(source, request).await {
            Ok(tag) => {
                info!(repo = %request.repo, constraint = %request.constraint, tag = %tag, "Resolved");
                publisher.publish(request, &tag)?;
                summary.resolved.insert(request.repo.to_string(), tag);
            }
            Err(e) => {
                error!(repo = %request.repo, "{}", e);
                match policy {
                    FailurePolicy::FailFast => return Err(RunError::Failed(vec![e])),
                    FailurePolicy::ContinueOnError => failures.push(e),
                }
            }
        }
    }

    publisher.publish_aggregate(&summary.resolved)?;

    if failures.is_empty() {
        Ok(summary)
    } else {
        Err(RunError::Failed(failures))
    }
}
