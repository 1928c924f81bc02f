//! Forced-update gate for applications distributed through mobile stores.
//!
//! [`gate::evaluate`] decides whether the running build is older than a
//! remotely required minimum version; [`prompt::UpdatePrompter`] runs that
//! decision on start and resume and keeps the user behind a prompt until they
//! update or, when allowed, dismiss it.

pub mod config;
pub mod console;
pub mod gate;
pub mod lifecycle;
pub mod prompt;
pub mod sources;
