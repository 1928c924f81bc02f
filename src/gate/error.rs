use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("Version string is empty")]
    Empty,

    #[error("Malformed version {input:?}: {reason}")]
    Malformed { input: String, reason: String },
}
