//! Output layer
//!
//! Turns resolved versions into step outputs, environment variables and
//! release download URLs.
//!
//! # Modules
//!
//! - [`sink`]: File command sinks (`$GITHUB_OUTPUT`, `$GITHUB_ENV`, stdout)
//! - [`publisher`]: Per-repository and aggregate publishing
//! - [`download`]: Download URL and filename pattern rendering

pub mod download;
pub mod publisher;
pub mod sink;
