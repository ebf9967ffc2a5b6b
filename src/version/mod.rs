//! Version parsing and next-tag selection
//!
//! The core of the crate: pure, synchronous functions from a set of
//! published tag strings to the next tag to publish.
//!
//! # Modules
//!
//! - [`types`]: the `Version` type, its tag grammar and total order
//! - [`rc`]: next release-candidate selection
//! - [`release`]: build-vs-retag decision for stable releases
//! - [`error`]: selection error types

pub mod error;
pub mod rc;
pub mod release;
pub mod types;
