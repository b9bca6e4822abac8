//! Version resolution layer
//!
//! Fetches raw tags from a tag source and selects the one that best
//! satisfies a version constraint.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  TagSource  │────▶│  Resolver   │◀────│ Constraint  │
//! │   (fetch)   │     │  (select)   │     │  (grammar)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │                   │
//!        ▼                   ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Registries  │     │   Semver    │     │    Range    │
//! │  (GitHub)   │     │ (normalize) │     │ (^ ~ >= x)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`constraint`]: Classification of constraint strings into a closed grammar
//! - [`range`]: Comparator-based range expressions
//! - [`resolver`]: Selection of the best matching tag
//! - [`registry`]: Tag source trait for fetching tags from remote sources
//! - [`registries`]: Concrete tag source implementations (GitHub)
//! - [`error`]: Error types for tag sources and constraint parsing
//! - [`semver`]: Shared semver utilities

pub mod constraint;
pub mod error;
pub mod range;
pub mod registries;
pub mod registry;
pub mod resolver;
pub mod semver;
