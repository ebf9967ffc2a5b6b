//! Build-vs-retag decision for stable releases
//!
//! A `release-x.y` branch owns the `x.y.*` patch series. The first stable
//! release of a series (`x.y.0`) is produced by promoting the newest
//! `x.y.0-rc.n` image; every later patch (`x.y.1`, `x.y.2`, ...) is built
//! fresh from the branch.

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::version::error::SelectError;
use crate::version::types::Version;

static BRANCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^release-(\d+)\.(\d+)$").unwrap());

/// Target major.minor pair parsed from a `release-x.y` branch name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseLine {
    pub major: u64,
    pub minor: u64,
}

impl ReleaseLine {
    pub fn from_branch(branch: &str) -> Result<Self, SelectError> {
        let caps = BRANCH_RE
            .captures(branch)
            .ok_or_else(|| SelectError::InvalidBranch(branch.to_string()))?;
        let major = caps[1]
            .parse()
            .map_err(|_| SelectError::InvalidBranch(branch.to_string()))?;
        let minor = caps[2]
            .parse()
            .map_err(|_| SelectError::InvalidBranch(branch.to_string()))?;
        Ok(Self { major, minor })
    }
}

/// How the next stable image should be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseAction {
    /// Build a new image from the release branch.
    Build,
    /// Retag an already built RC image.
    Retag { source: Version },
}

/// Decision record handed back to CI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleasePlan {
    pub next: Version,
    pub action: ReleaseAction,
}

impl ReleasePlan {
    pub fn build(&self) -> bool {
        matches!(self.action, ReleaseAction::Build)
    }

    pub fn retag(&self) -> bool {
        !self.build()
    }

    /// The RC tag to promote, present only when retagging.
    pub fn source(&self) -> Option<Version> {
        match self.action {
            ReleaseAction::Retag { source } => Some(source),
            ReleaseAction::Build => None,
        }
    }
}

/// Compute the next stable tag for `line` and whether to build or retag.
pub fn plan_release(tags: &[String], line: ReleaseLine) -> Result<ReleasePlan, SelectError> {
    let versions: Vec<Version> = tags.iter().filter_map(|t| Version::parse(t)).collect();

    let latest_patch = versions
        .iter()
        .filter(|v| v.major == line.major && v.minor == line.minor && v.is_release())
        .map(|v| v.patch)
        .max();

    if let Some(patch) = latest_patch {
        // Saturating: parse accepts any u64, so u64::MAX must not panic.
        let next = Version::release(line.major, line.minor, patch.saturating_add(1));
        info!("existing {}.{}.* releases found, next is {}", line.major, line.minor, next);
        return Ok(ReleasePlan {
            next,
            action: ReleaseAction::Build,
        });
    }

    // No stable release on this line yet: promote the newest x.y.0 RC.
    let latest_rc = versions
        .iter()
        .filter(|v| v.major == line.major && v.minor == line.minor && v.patch == 0)
        .filter_map(|v| v.rc)
        .max();

    // TODO: fall back to building x.y.0 fresh from the branch when no RC was
    // ever published, instead of failing.
    let rc = latest_rc.ok_or(SelectError::NoCandidate {
        major: line.major,
        minor: line.minor,
    })?;

    let next = Version::release(line.major, line.minor, 0);
    let source = Version::candidate(line.major, line.minor, 0, rc);
    info!("no {}.{}.* release yet, promoting {}", line.major, line.minor, source);

    Ok(ReleasePlan {
        next,
        action: ReleaseAction::Retag { source },
    })
}
