//! Tag resolution
//!
//! Selects the tag that best satisfies a [`Constraint`]:
//! - `latest`: first tag in the order the tag source returned them
//! - everything else: highest satisfying semantic version, returned as the
//!   original tag string (prefix style preserved)

use std::cmp::Ordering;

use semver::Version;
use tracing::trace;

use crate::version::constraint::Constraint;
use crate::version::semver::{cmp_precedence, normalize_tag};

/// Outcome of resolving a constraint against a tag list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// The original tag string that was selected
    Matched(String),
    /// No tag satisfied the constraint
    NoMatch,
}

impl MatchResult {
    pub fn into_option(self) -> Option<String> {
        match self {
            MatchResult::Matched(tag) => Some(tag),
            MatchResult::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched(_))
    }
}

impl From<Option<&str>> for MatchResult {
    fn from(tag: Option<&str>) -> Self {
        tag.map_or(MatchResult::NoMatch, |t| MatchResult::Matched(t.to_string()))
    }
}

/// Resolve `constraint` against `tags`
///
/// Tags that do not parse as a semantic version (after stripping one
/// leading prefix character) are skipped. Among equal-precedence tags the
/// earliest in `tags` wins.
pub fn resolve<S: AsRef<str>>(tags: &[S], constraint: &Constraint) -> MatchResult {
    if let Constraint::Latest = constraint {
        return MatchResult::from(tags.first().map(|t| t.as_ref()));
    }

    let mut best: Option<(&str, Version)> = None;

    for tag in tags {
        let raw = tag.as_ref();
        let Some(version) = normalize_tag(raw) else {
            trace!(tag = raw, "Skipping tag that is not a semantic version");
            continue;
        };

        if !constraint.matches(&version) {
            continue;
        }

        let is_better = best
            .as_ref()
            .is_none_or(|(_, current)| cmp_precedence(&version, current) == Ordering::Greater);
        if is_better {
            best = Some((raw, version));
        }
    }

    MatchResult::from(best.map(|(raw, _)| raw))
}
