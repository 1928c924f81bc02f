//! Lifecycle-triggered update check and the blocking prompt loop

use std::backtrace::Backtrace;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::config::GateConfig;
use crate::gate::{GateDecision, PlatformKind, evaluate, store_url};
use crate::prompt::effects::{PromptPresenter, RequiredVersionSource, StoreLauncher};
use crate::prompt::error::UpdateError;
use crate::prompt::package_info::CachedPackageInfo;
use crate::prompt::state::{PromptOutcome, Resolution, RetryState};

/// Receives errors raised by collaborators, with a backtrace captured where
/// the error surfaced inside the check
pub type ExceptionHandler = Arc<dyn Fn(UpdateError, Backtrace) + Send + Sync>;

/// Why a check ended before evaluating or prompting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A prompt was already visible when the check started
    AlertVisible,
    /// No store listing exists for this platform or configuration
    NoStoreUrl,
    /// Another check started showing its prompt first
    PromptTaken,
}

/// How a single `check_and_maybe_prompt` call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Skipped(SkipReason),
    /// Gate evaluated to anything other than `UpdateRequired`
    Passed(GateDecision),
    Resolved(Resolution),
    /// A collaborator failed and the error went to the exception handler
    Failed,
}

/// Prompter settings taken from `GateConfig`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrompterOptions {
    pub allow_cancel: bool,
    pub ios_app_store_id: String,
    pub android_package_name: Option<String>,
}

impl From<&GateConfig> for PrompterOptions {
    fn from(config: &GateConfig) -> Self {
        Self {
            allow_cancel: config.allow_cancel,
            ios_app_store_id: config.ios_app_store_id.clone(),
            android_package_name: config.android_package_name.clone(),
        }
    }
}

/// Collaborator error and the stack it surfaced on
struct Raised {
    error: UpdateError,
    backtrace: Backtrace,
}

impl<E> From<E> for Raised
where
    UpdateError: From<E>,
{
    fn from(error: E) -> Self {
        Self {
            error: UpdateError::from(error),
            backtrace: Backtrace::capture(),
        }
    }
}

/// Marks the prompt as visible; cleared on drop, including when the prompt
/// future fails or is abandoned.
struct AlertVisibility<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AlertVisibility<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for AlertVisibility<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct UpdatePrompter {
    options: PrompterOptions,
    platform: PlatformKind,
    package_info: Arc<CachedPackageInfo>,
    version_source: Arc<dyn RequiredVersionSource>,
    presenter: Arc<dyn PromptPresenter>,
    launcher: Arc<dyn StoreLauncher>,
    on_exception: Option<ExceptionHandler>,
    alert_visible: AtomicBool,
}

impl UpdatePrompter {
    /// Create a prompter for the current platform with no exception handler
    pub fn new(
        options: PrompterOptions,
        package_info: Arc<CachedPackageInfo>,
        version_source: Arc<dyn RequiredVersionSource>,
        presenter: Arc<dyn PromptPresenter>,
        launcher: Arc<dyn StoreLauncher>,
    ) -> Self {
        Self {
            options,
            platform: PlatformKind::current(),
            package_info,
            version_source,
            presenter,
            launcher,
            on_exception: None,
            alert_visible: AtomicBool::new(false),
        }
    }

    pub fn with_platform(mut self, platform: PlatformKind) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_exception_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(UpdateError, Backtrace) + Send + Sync + 'static,
    {
        self.on_exception = Some(Arc::new(handler));
        self
    }

    pub fn platform(&self) -> PlatformKind {
        self.platform
    }

    pub fn is_alert_visible(&self) -> bool {
        self.alert_visible.load(Ordering::Acquire)
    }

    /// Resolve the store listing URL for this platform.
    ///
    /// On Android the configured package name wins over the package id of
    /// the running build.
    pub async fn store_url(&self) -> Result<Option<String>, UpdateError> {
        if self.platform != PlatformKind::Android {
            return Ok(store_url(
                self.platform,
                &self.options.ios_app_store_id,
                "",
            ));
        }

        let package_name = match &self.options.android_package_name {
            Some(name) => name.clone(),
            None => self.package_info.get().await?.package_id.clone(),
        };
        Ok(store_url(self.platform, "", &package_name))
    }

    /// Check the gate and, if an update is required, prompt until the user
    /// makes a decision.
    ///
    /// Returns immediately if a prompt is already visible. Collaborator
    /// errors go to the exception handler when one is installed, otherwise
    /// they are returned.
    pub async fn check_and_maybe_prompt(&self) -> Result<CheckOutcome, UpdateError> {
        if self.is_alert_visible() {
            debug!("Update prompt already visible, skipping check");
            return Ok(CheckOutcome::Skipped(SkipReason::AlertVisible));
        }

        match self.run_check().await {
            Ok(outcome) => Ok(outcome),
            Err(Raised { error, backtrace }) => match &self.on_exception {
                Some(handler) => {
                    warn!("Update check failed: {}", error);
                    handler(error, backtrace);
                    Ok(CheckOutcome::Failed)
                }
                None => Err(error),
            },
        }
    }

    async fn run_check(&self) -> Result<CheckOutcome, Raised> {
        let Some(url) = self.store_url().await? else {
            debug!("No store listing for platform {}", self.platform);
            return Ok(CheckOutcome::Skipped(SkipReason::NoStoreUrl));
        };

        let required_version = self.version_source.fetch_required_version().await?;
        let local = self.package_info.get().await?;

        let decision = evaluate(&required_version, &local.version, self.platform);
        if !decision.requires_update() {
            return Ok(CheckOutcome::Passed(decision));
        }

        info!(
            "Update required: local {} < required {}",
            local.version, required_version
        );
        self.run_prompt_loop(&url).await
    }

    async fn run_prompt_loop(&self, url: &str) -> Result<CheckOutcome, Raised> {
        let allow_cancel = self.options.allow_cancel;
        let mut state = RetryState::initial();

        loop {
            match state {
                RetryState::Prompting => {
                    let Some(outcome) = self.prompt_once(allow_cancel).await? else {
                        debug!("Another check is showing the update prompt");
                        return Ok(CheckOutcome::Skipped(SkipReason::PromptTaken));
                    };
                    state = state.on_outcome(outcome, allow_cancel);
                    if state == RetryState::Prompting {
                        info!("Update prompt dismissed without a decision, showing again");
                    }
                }
                RetryState::Resolved(Resolution::Accepted) => {
                    info!("Opening store listing {}", url);
                    self.launcher.open_store_listing(url).await?;
                    return Ok(CheckOutcome::Resolved(Resolution::Accepted));
                }
                RetryState::Resolved(resolution) => {
                    info!("Update prompt resolved: {:?}", resolution);
                    return Ok(CheckOutcome::Resolved(resolution));
                }
            }
        }
    }

    /// Show the prompt once. `None` if another prompt is already visible.
    async fn prompt_once(&self, allow_cancel: bool) -> Result<Option<PromptOutcome>, Raised> {
        let Some(visibility) = AlertVisibility::acquire(&self.alert_visible) else {
            return Ok(None);
        };
        let outcome = self.presenter.show_prompt(allow_cancel).await;
        drop(visibility);

        Ok(Some(outcome?))
    }
}
