//! Version gate: decides whether the running build must be upgraded
//!
//! # Modules
//!
//! - [`decision`]: `evaluate` and the `GateDecision` it returns
//! - [`platform`]: Platform detection and store listing URLs
//! - [`semver`]: Strict `major.minor.patch` parsing and prefix extraction
//! - [`error`]: Parse errors, absorbed inside the gate

pub mod decision;
pub mod error;
pub mod platform;
pub mod semver;

pub use decision::{GateDecision, IndeterminateReason, evaluate};
pub use platform::{PlatformKind, store_url};
pub use semver::SemanticVersion;
