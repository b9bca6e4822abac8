//! Constraint classification
//!
//! Every constraint string maps to exactly one grammar:
//! - `latest` (any case): trust the tag source's ordering
//! - `v0.1.1`, `1.0.0-rc.1`: exact equality
//! - `v1`, `1.2`: prefix widening (`1` => `>=1.0.0 <2.0.0`)
//! - anything else: [`VersionRange`] syntax (`^`, `~`, `>=`, `x`, `||`, ...)

use std::str::FromStr;

use semver::Version;

use crate::version::error::ConstraintError;
use crate::version::range::VersionRange;
use crate::version::semver::cmp_precedence;

/// Literal selecting the first tag reported by the tag source
pub const LATEST: &str = "latest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// First tag in source order, no semver parsing
    Latest,
    /// Exact version match (build metadata ignored)
    Exact(Version),
    /// Bare major or major.minor prefix
    Prefix { major: u64, minor: Option<u64> },
    /// Operator-bearing or wildcard range expression
    Range(VersionRange),
}

impl Constraint {
    /// Parse a constraint string into its grammar
    pub fn parse(spec: &str) -> Result<Self, ConstraintError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(ConstraintError::Empty);
        }

        if spec.eq_ignore_ascii_case(LATEST) {
            return Ok(Constraint::Latest);
        }

        if let Some(bare) = bare_token(spec) {
            if let Ok(version) = Version::parse(bare) {
                return Ok(Constraint::Exact(version));
            }

            let parts: Vec<&str> = bare.split('.').collect();
            if parts.len() <= 2 && parts.iter().all(|p| is_numeric(p)) {
                let mut numbers = parts.iter().map(|p| p.parse::<u64>());
                let major = numbers
                    .next()
                    .and_then(Result::ok)
                    .ok_or_else(|| ConstraintError::InvalidVersion(spec.to_string()))?;
                let minor = numbers
                    .next()
                    .transpose()
                    .map_err(|_| ConstraintError::InvalidVersion(spec.to_string()))?;
                return Ok(Constraint::Prefix { major, minor });
            }
        }

        VersionRange::parse(spec).map(Constraint::Range)
    }

    /// Check whether a normalized version satisfies this constraint
    ///
    /// `Latest` is not version based and accepts everything; callers are
    /// expected to branch on it before normalizing tags.
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Constraint::Latest => true,
            Constraint::Exact(expected) => cmp_precedence(version, expected).is_eq(),
            Constraint::Prefix { major, minor } => {
                version.pre.is_empty()
                    && version.major == *major
                    && minor.is_none_or(|minor| version.minor == minor)
            }
            Constraint::Range(range) => range.satisfies(version),
        }
    }
}

impl FromStr for Constraint {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Return the operand of a single operator-free token, prefix character removed
///
/// `v1.2` -> `1.2`, `1.2.3` -> `1.2.3`; `>=1`, `1.x`, `^1` and multi-token
/// specs are not bare.
fn bare_token(spec: &str) -> Option<&str> {
    if spec.chars().any(char::is_whitespace) {
        return None;
    }

    let body = match spec.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => &spec[1..],
        _ => spec,
    };

    let starts_with_digit = body.chars().next().is_some_and(|c| c.is_ascii_digit());
    let has_wildcard = body
        .split(['.', '-', '+'])
        .take(3)
        .any(|p| matches!(p, "x" | "X" | "*"));

    (starts_with_digit && !has_wildcard && !body.contains("||")).then_some(body)
}

fn is_numeric(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}
