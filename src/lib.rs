//! Next-tag computation for container images published to GHCR
//!
//! Two flows drive release automation in CI: computing the next
//! release-candidate tag from the latest published tags, and computing the
//! next stable tag for a `release-x.y` branch together with the decision to
//! build a fresh image or retag an existing RC image.

pub mod config;
pub mod output;
pub mod registry;
pub mod version;
