//! Structured representation of container image version tags

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Anchored tag grammar: `x.y.z` or `x.y.z-rc.n`
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:-rc\.(\d+))?$").unwrap());

/// A parsed version tag.
///
/// `rc: None` is a stable release, `rc: Some(n)` a release candidate for the
/// same `major.minor.patch` triple. A stable release orders after every RC of
/// its triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub rc: Option<u64>,
}

impl Version {
    pub fn release(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            rc: None,
        }
    }

    pub fn candidate(major: u64, minor: u64, patch: u64, rc: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            rc: Some(rc),
        }
    }

    /// Parse a tag string into a `Version`.
    ///
    /// Returns `None` for anything that is not exactly `x.y.z` or
    /// `x.y.z-rc.n` (e.g. `latest`, `v1.2.3`, `1.2.3-beta.1`) and for
    /// components that overflow `u64`. Callers skip such tags silently.
    pub fn parse(tag: &str) -> Option<Self> {
        let caps = TAG_RE.captures(tag)?;
        let major = caps[1].parse().ok()?;
        let minor = caps[2].parse().ok()?;
        let patch = caps[3].parse().ok()?;
        let rc = match caps.get(4) {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };
        Some(Self {
            major,
            minor,
            patch,
            rc,
        })
    }

    pub fn is_release(&self) -> bool {
        self.rc.is_none()
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            // A missing rc sorts after any present rc of the same triple.
            .then_with(|| match (self.rc, other.rc) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(&b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rc {
            Some(rc) => write!(f, "{}.{}.{}-rc.{}", self.major, self.minor, self.patch, rc),
            None => write!(f, "{}.{}.{}", self.major, self.minor, self.patch),
        }
    }
}
