//! Collaborators injected into the update prompter
//!
//! Fetching the required version, rendering the prompt, opening the store and
//! reading local package metadata are environment specific; the prompter only
//! sees these traits.

#[cfg(test)]
use mockall::automock;

use crate::prompt::error::{FetchError, PackageInfoError, PromptError, StoreOpenError};
use crate::prompt::package_info::PackageInfo;
use crate::prompt::state::PromptOutcome;

/// Source of the remotely required minimum version
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait RequiredVersionSource: Send + Sync {
    /// Fetches the required version string.
    ///
    /// # Returns
    /// * `Ok("")` - No required version is configured
    /// * `Ok(version)` - Raw version string, validated later by the gate
    /// * `Err(FetchError)` - Only for genuine transport failures
    async fn fetch_required_version(&self) -> Result<String, FetchError>;
}

/// Modal update prompt
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PromptPresenter: Send + Sync {
    /// Shows the prompt and waits for the user.
    ///
    /// Must return `PromptOutcome::Dismissed` rather than hang when the user
    /// closes the prompt without choosing.
    async fn show_prompt(&self, allow_cancel: bool) -> Result<PromptOutcome, PromptError>;
}

/// Opens the store listing for the application
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait StoreLauncher: Send + Sync {
    async fn open_store_listing(&self, url: &str) -> Result<(), StoreOpenError>;
}

/// Reads metadata of the running build
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PackageInfoProvider: Send + Sync {
    async fn package_info(&self) -> Result<PackageInfo, PackageInfoError>;
}
