//! Version label parsing and ordering.
//!
//! Release labels arrive in whatever shape the remote uses: semantic versions
//! (`2.6.1`), commit timestamps (`2020-02-06T09:35:51Z`), branch heads or
//! opaque tags (`nightly-1487`). This module classifies a label once and
//! compares any two labels with a single total ordering, so the rest of the
//! crate never has to care which backend produced them.
//!
//! Two labels of the same kind use that kind's native ordering (semver
//! precedence, chronological order). Everything else falls back to a
//! segment-by-segment comparison in the style of PHP's `version_compare`:
//! numeric runs compare numerically, known pre-release words rank below a
//! plain release (`1.0-rc1` < `1.0`) and a continuing numeric segment ranks
//! above a shorter label (`1.0.1` > `1.0`).

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};

/// What a version label turned out to be after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionKind {
    /// A well-formed semantic version, compared by semver precedence.
    Semantic(semver::Version),
    /// An ISO-8601 / RFC 3339 timestamp, compared chronologically.
    Timestamp(DateTime<Utc>),
    /// Anything else. Compared segment-by-segment against other labels.
    Opaque,
}

/// A parsed version label.
///
/// Parsing never fails: a label that is neither a semantic version nor a
/// timestamp is kept as an opaque tag and still participates in ordering.
/// The original spelling is preserved for display and for building archive
/// names, while comparisons run on a normalized form with leading `v`,
/// `version-` and `release-` decorations stripped.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    normalized: String,
    kind: VersionKind,
}

impl Version {
    /// Parse a version label.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        let raw = label.trim().to_string();
        let normalized = strip_decorations(&raw).to_string();

        let kind = if let Ok(timestamp) = DateTime::parse_from_rfc3339(&normalized) {
            VersionKind::Timestamp(timestamp.with_timezone(&Utc))
        } else if let Ok(semantic) = semver::Version::parse(&normalized) {
            VersionKind::Semantic(semantic)
        } else {
            VersionKind::Opaque
        };

        Self {
            raw,
            normalized,
            kind,
        }
    }

    /// The label exactly as it was provided (modulo surrounding whitespace).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The classification this label received during parsing.
    #[must_use]
    pub const fn kind(&self) -> &VersionKind {
        &self.kind
    }

    /// Whether this version sorts strictly after `other`.
    #[must_use]
    pub fn is_newer_than(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Greater
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.kind, &other.kind) {
            (VersionKind::Semantic(a), VersionKind::Semantic(b)) => a.cmp(b),
            (VersionKind::Timestamp(a), VersionKind::Timestamp(b)) => a.cmp(b),
            _ => compare_segments(&self.normalized, &other.normalized),
        }
    }
}

/// Compare two raw labels, returning whether `available` is newer than
/// `current`. Convenience wrapper for the update check.
#[must_use]
pub fn is_newer(current: &str, available: &str) -> bool {
    Version::parse(available).is_newer_than(&Version::parse(current))
}

/// Strip common release-tag decorations so `v1.2.3`, `version-1.2.3` and
/// `release-1.2.3` all compare equal to `1.2.3`.
fn strip_decorations(label: &str) -> &str {
    if let Some(rest) = label.strip_prefix("version-") {
        rest
    } else if let Some(rest) = label.strip_prefix("release-") {
        rest
    } else if let Some(rest) = label.strip_prefix('v')
        && rest.starts_with(|c: char| c.is_ascii_digit())
    {
        rest
    } else {
        label
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment {
    Number(u64),
    Text(String),
}

/// Relative weight of a segment when two labels diverge. Known pre-release
/// words rank below a missing segment, numbers and patch-level suffixes
/// above it. This reproduces the familiar `version_compare` behavior where
/// `1.0-rc1` < `1.0` < `1.0.0` < `1.0.1`.
fn segment_rank(segment: Option<&Segment>) -> u8 {
    match segment {
        Some(Segment::Text(text)) => match text.as_str() {
            "dev" => 1,
            "alpha" | "a" => 2,
            "beta" | "b" => 3,
            "rc" | "c" => 4,
            "pl" | "p" => 7,
            _ => 0,
        },
        None => 5,
        Some(Segment::Number(_)) => 6,
    }
}

fn tokenize(label: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut current_is_digit = false;

    let mut flush = |buffer: &mut String, is_digit: bool, out: &mut Vec<Segment>| {
        if buffer.is_empty() {
            return;
        }
        if is_digit {
            // Runs long enough to overflow u64 are effectively opaque.
            match buffer.parse::<u64>() {
                Ok(value) => out.push(Segment::Number(value)),
                Err(_) => out.push(Segment::Text(buffer.clone())),
            }
        } else {
            out.push(Segment::Text(buffer.to_lowercase()));
        }
        buffer.clear();
    };

    for c in label.chars() {
        if matches!(c, '.' | '-' | '_' | '+' | ':') {
            flush(&mut current, current_is_digit, &mut segments);
            continue;
        }
        let is_digit = c.is_ascii_digit();
        if !current.is_empty() && is_digit != current_is_digit {
            flush(&mut current, current_is_digit, &mut segments);
        }
        current_is_digit = is_digit;
        current.push(c);
    }
    flush(&mut current, current_is_digit, &mut segments);

    segments
}

fn compare_segments(left: &str, right: &str) -> Ordering {
    let left_segments = tokenize(left);
    let right_segments = tokenize(right);
    let length = left_segments.len().max(right_segments.len());

    for index in 0..length {
        let a = left_segments.get(index);
        let b = right_segments.get(index);

        let ordering = match (a, b) {
            (Some(Segment::Number(x)), Some(Segment::Number(y))) => x.cmp(y),
            (Some(Segment::Text(x)), Some(Segment::Text(y))) => {
                match segment_rank(a).cmp(&segment_rank(b)) {
                    // Two unknown words fall back to lexicographic order.
                    Ordering::Equal if segment_rank(a) == 0 => x.cmp(y),
                    ordering => ordering,
                }
            }
            _ => segment_rank(a).cmp(&segment_rank(b)),
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}
