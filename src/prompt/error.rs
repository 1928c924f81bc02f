use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Transport failure: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum PackageInfoError {
    #[error("Package metadata unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt could not be shown: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
#[error("Failed to open store listing {url}: {reason}")]
pub struct StoreOpenError {
    pub url: String,
    pub reason: String,
}

/// Failure raised by an injected collaborator during a check
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("Failed to fetch required version: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    PackageInfo(#[from] PackageInfoError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    StoreOpen(#[from] StoreOpenError),
}
