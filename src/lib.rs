//! Resolve, for a set of repositories, the published tag that best satisfies a
//! semantic version constraint, and publish it as workflow outputs.
//!
//! - [`version`]: tag sources, constraint grammar and tag selection
//! - [`output`]: step outputs, environment exports and download URLs
//! - [`runner`]: per-repository pipeline and failure policy
//! - [`config`] / [`cli`]: repository list and command line options

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod runner;
pub mod version;
