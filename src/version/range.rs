//! Range grammar for version constraints
//!
//! Supports the standard semver range specifications:
//! - `1.2.3`, `=1.2.3` - exact match
//! - `^1.2.3` - compatible with version (>=1.2.3 <2.0.0, narrower for 0.x)
//! - `~1.2.3` - approximately equivalent (>=1.2.3 <1.3.0)
//! - `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3` - comparison operators
//! - `1.2.x`, `1.x`, `*`, `1.2`, `1` - wildcards and partial versions
//! - `1.2.3 - 2.3.4` - hyphen ranges
//! - `>=1.0.0 <2.0.0` - AND (space separated), `^1.0.0 || ^2.0.0` - OR
//!
//! Version operands may carry a single `v` prefix and may be separated from
//! their operator by whitespace (`>= v0.1.0`).

use std::cmp::Ordering;

use semver::{BuildMetadata, Prerelease, Version};

use crate::version::error::ConstraintError;
use crate::version::semver::{cmp_precedence, same_release};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// Single primitive comparison against a concrete version
#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    op: Op,
    version: Version,
}

impl Comparator {
    fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    /// Comparator that no release can satisfy (`<0.0.0`)
    fn never() -> Self {
        Self::new(Op::Lt, Version::new(0, 0, 0))
    }

    fn matches(&self, version: &Version) -> bool {
        let ord = cmp_precedence(version, &self.version);
        match self.op {
            Op::Eq => ord == Ordering::Equal,
            Op::Gt => ord == Ordering::Greater,
            Op::Gte => ord != Ordering::Less,
            Op::Lt => ord == Ordering::Less,
            Op::Lte => ord != Ordering::Greater,
        }
    }
}

/// AND of comparators; an empty set accepts every release
#[derive(Debug, Clone, PartialEq, Eq)]
struct ComparatorSet(Vec<Comparator>);

impl ComparatorSet {
    fn satisfies(&self, version: &Version) -> bool {
        if !self.0.iter().all(|c| c.matches(version)) {
            return false;
        }

        if version.pre.is_empty() {
            return true;
        }

        // Pre-releases only match when the range opts into that exact release line
        self.0
            .iter()
            .any(|c| !c.version.pre.is_empty() && same_release(&c.version, version))
    }
}

/// Parsed version range: OR of comparator sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    sets: Vec<ComparatorSet>,
}

impl VersionRange {
    /// Parse a range expression
    pub fn parse(spec: &str) -> Result<Self, ConstraintError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(ConstraintError::Empty);
        }

        let sets = spec
            .split("||")
            .map(|part| parse_comparator_set(part.trim(), spec))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { sets })
    }

    /// Check if a version satisfies this range
    pub fn satisfies(&self, version: &Version) -> bool {
        self.sets.iter().any(|set| set.satisfies(version))
    }
}

/// Operators recognised in front of a version operand, longest first
const OPERATORS: &[&str] = &[">=", "<=", "~>", ">", "<", "=", "^", "~"];

fn parse_comparator_set(part: &str, spec: &str) -> Result<ComparatorSet, ConstraintError> {
    if part.is_empty() {
        return Err(ConstraintError::EmptySet(spec.to_string()));
    }

    let tokens: Vec<&str> = part.split_whitespace().collect();

    if let [from, "-", to] = tokens.as_slice() {
        let from = Partial::parse(from)?;
        let to = Partial::parse(to)?;
        return Ok(ComparatorSet(hyphen(&from, &to)));
    }

    let mut comparators = Vec::new();
    let mut iter = tokens.into_iter();

    while let Some(token) = iter.next() {
        let (op, operand) = split_operator(token);

        // `>= 1.0.0`: operator and operand arrive as separate tokens
        let operand = if operand.is_empty() {
            match iter.next() {
                Some(next) => next,
                None => return Err(ConstraintError::DanglingOperator(op.to_string())),
            }
        } else {
            operand
        };

        let partial = Partial::parse(operand)?;
        comparators.extend(desugar(op, &partial));
    }

    Ok(ComparatorSet(comparators))
}

fn split_operator(token: &str) -> (&str, &str) {
    OPERATORS
        .iter()
        .find_map(|op| token.strip_prefix(op).map(|rest| (*op, rest)))
        .unwrap_or(("", token))
}

/// A possibly incomplete version operand (`1`, `1.2`, `1.x`, `*`, `1.2.3-rc.1`)
#[derive(Debug, Clone, PartialEq, Eq)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Partial {
    fn parse(operand: &str) -> Result<Self, ConstraintError> {
        let invalid = || ConstraintError::InvalidVersion(operand.to_string());
        let body = strip_operand_prefix(operand);

        // Build metadata never affects matching
        let body = body.split_once('+').map_or(body, |(core, _)| core);
        let (core, pre) = match body.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (body, None),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(invalid());
        }

        let mut components = [None; 3];
        let mut wildcard_seen = false;
        for (slot, part) in components.iter_mut().zip(&parts) {
            if matches!(*part, "x" | "X" | "*") {
                wildcard_seen = true;
                continue;
            }
            if wildcard_seen || part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = Some(part.parse::<u64>().map_err(|_| invalid())?);
        }

        let [major, minor, patch] = components;
        let pre = match pre {
            Some(pre) if patch.is_some() => Prerelease::new(pre).map_err(|_| invalid())?,
            Some(_) => return Err(invalid()),
            None => Prerelease::EMPTY,
        };

        Ok(Self {
            major,
            minor,
            patch,
            pre,
        })
    }

    /// Fill missing components with zeros
    fn floor(&self) -> Version {
        Version {
            major: self.major.unwrap_or(0),
            minor: self.minor.unwrap_or(0),
            patch: self.patch.unwrap_or(0),
            pre: self.pre.clone(),
            build: BuildMetadata::EMPTY,
        }
    }
}

/// Strip one optional alphabetic prefix (`v1.2.3`), keeping `x` wildcards intact
fn strip_operand_prefix(operand: &str) -> &str {
    match operand.chars().next() {
        Some(c) if c.is_ascii_alphabetic() && !matches!(c, 'x' | 'X') => &operand[1..],
        _ => operand,
    }
}

fn next_major(major: u64) -> Version {
    Version::new(major.saturating_add(1), 0, 0)
}

fn next_minor(major: u64, minor: u64) -> Version {
    Version::new(major, minor.saturating_add(1), 0)
}

/// Exclusive upper bound of a partial version treated as an X-range
fn x_range_ceiling(partial: &Partial) -> Option<Version> {
    match (partial.major, partial.minor, partial.patch) {
        (Some(major), None, _) => Some(next_major(major)),
        (Some(major), Some(minor), None) => Some(next_minor(major, minor)),
        _ => None,
    }
}

/// Translate one operator/operand pair into primitive comparators
fn desugar(op: &str, partial: &Partial) -> Vec<Comparator> {
    let Some(major) = partial.major else {
        // `*`, `x`, `>=*`: anything; `<*`, `>*`: nothing
        return match op {
            "<" | ">" => vec![Comparator::never()],
            _ => vec![],
        };
    };
    let floor = partial.floor();
    let full = partial.patch.is_some();

    match op {
        "" | "=" => match x_range_ceiling(partial) {
            Some(ceiling) => vec![
                Comparator::new(Op::Gte, floor),
                Comparator::new(Op::Lt, ceiling),
            ],
            None => vec![Comparator::new(Op::Eq, floor)],
        },
        ">" => match x_range_ceiling(partial) {
            Some(ceiling) => vec![Comparator::new(Op::Gte, ceiling)],
            None => vec![Comparator::new(Op::Gt, floor)],
        },
        ">=" => vec![Comparator::new(Op::Gte, floor)],
        "<" => vec![Comparator::new(Op::Lt, floor)],
        "<=" => match x_range_ceiling(partial) {
            Some(ceiling) => vec![Comparator::new(Op::Lt, ceiling)],
            None => vec![Comparator::new(Op::Lte, floor)],
        },
        "~" | "~>" => {
            let ceiling = match partial.minor {
                Some(minor) => next_minor(major, minor),
                None => next_major(major),
            };
            vec![
                Comparator::new(Op::Gte, floor),
                Comparator::new(Op::Lt, ceiling),
            ]
        }
        "^" => {
            let minor = partial.minor;
            let ceiling = match (major, minor) {
                (0, None) => next_major(0),
                (0, Some(0)) if full => Version::new(0, 0, floor.patch.saturating_add(1)),
                (0, Some(minor)) => next_minor(0, minor),
                _ => next_major(major),
            };
            vec![
                Comparator::new(Op::Gte, floor),
                Comparator::new(Op::Lt, ceiling),
            ]
        }
        _ => unreachable!("operator list is closed"),
    }
}

/// `from - to`: inclusive bounds, with partial upper bounds widened
fn hyphen(from: &Partial, to: &Partial) -> Vec<Comparator> {
    let mut comparators = Vec::new();

    if from.major.is_some() {
        comparators.push(Comparator::new(Op::Gte, from.floor()));
    }

    if to.major.is_some() {
        match x_range_ceiling(to) {
            Some(ceiling) => comparators.push(Comparator::new(Op::Lt, ceiling)),
            None => comparators.push(Comparator::new(Op::Lte, to.floor())),
        }
    }

    comparators
}
