use std::cmp::Ordering;

use semver::Version;

/// Strip one leading non-digit character from a raw tag.
///
/// Examples:
/// - "v1.2.3" -> "1.2.3"
/// - "1.2.3" -> "1.2.3"
/// - "release-1.0.0" -> "elease-1.0.0" (and therefore not a version)
pub fn strip_tag_prefix(tag: &str) -> &str {
    match tag.chars().next() {
        Some(c) if !c.is_ascii_digit() => &tag[c.len_utf8()..],
        _ => tag,
    }
}

/// Parse a raw tag into a semver::Version after trimming and prefix stripping.
///
/// Returns None for tags that are not full `major.minor.patch` versions
/// (e.g. "latest", "v1", "release-notes").
pub fn normalize_tag(tag: &str) -> Option<Version> {
    Version::parse(strip_tag_prefix(tag.trim())).ok()
}

/// Compare two versions by semver precedence, ignoring build metadata.
pub fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch)
        .cmp(&(b.major, b.minor, b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}

/// Whether two versions share the same `major.minor.patch` tuple
pub fn same_release(a: &Version, b: &Version) -> bool {
    a.major == b.major && a.minor == b.minor && a.patch == b.patch
}
