//! Registry access layer
//!
//! The only external data source: the GitHub package-versions API, reduced
//! to "give me every tag of this container package". Pagination, auth and
//! status handling live here so the selectors in [`crate::version`] stay
//! pure.

pub mod error;
pub mod ghcr;
