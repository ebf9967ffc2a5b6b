//! Next release-candidate selection

use tracing::info;

use crate::version::types::Version;

/// Tag proposed when the package has no parseable version tags yet.
const BOOTSTRAP: Version = Version {
    major: 1,
    minor: 0,
    patch: 0,
    rc: Some(0),
};

/// Compute the next RC tag from the published tag set.
///
/// Unparsable tags are skipped. An empty tag set is the normal
/// "package not published yet" case and yields the bootstrap tag.
pub fn next_rc(tags: &[String]) -> Version {
    let Some(latest) = tags.iter().filter_map(|t| Version::parse(t)).max() else {
        info!("no valid version tags found, starting at {}", BOOTSTRAP);
        return BOOTSTRAP;
    };

    info!("current latest version is {}", latest);

    // Increments saturate: parse accepts any u64, so a component already at
    // u64::MAX must not panic.
    match latest.rc {
        // Continue the RC series of the same triple.
        Some(n) => Version {
            rc: Some(n.saturating_add(1)),
            ..latest
        },
        // Latest is a stable release: open a fresh minor-bump RC series.
        None => Version::candidate(latest.major, latest.minor.saturating_add(1), 0, 0),
    }
}
