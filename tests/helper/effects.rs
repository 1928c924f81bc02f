//! Fake collaborators for driving `UpdatePrompter` in tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore, mpsc};

use update_gate::gate::PlatformKind;
use update_gate::prompt::effects::{PromptPresenter, RequiredVersionSource, StoreLauncher};
use update_gate::prompt::error::{FetchError, PromptError, StoreOpenError};
use update_gate::prompt::package_info::{CachedPackageInfo, PackageInfo, StaticPackageInfo};
use update_gate::prompt::{PromptOutcome, PrompterOptions, UpdatePrompter};

pub const PACKAGE_ID: &str = "com.example.app";
pub const PLAY_STORE_URL: &str = "https://play.google.com/store/apps/details?id=com.example.app";

/// Source returning a fixed version and reporting every fetch
pub struct FixedSource {
    version: String,
    calls: AtomicUsize,
    fetched: Option<mpsc::UnboundedSender<()>>,
}

impl FixedSource {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            calls: AtomicUsize::new(0),
            fetched: None,
        }
    }

    pub fn notifying(version: &str) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let source = Self {
            fetched: Some(tx),
            ..Self::new(version)
        };
        (source, rx)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RequiredVersionSource for FixedSource {
    async fn fetch_required_version(&self) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(fetched) = &self.fetched {
            let _ = fetched.send(());
        }
        Ok(self.version.clone())
    }
}

/// Source that blocks every fetch until `release` lets it through
pub struct HeldSource {
    version: String,
    calls: AtomicUsize,
    gate: Semaphore,
}

impl HeldSource {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            calls: AtomicUsize::new(0),
            gate: Semaphore::new(0),
        }
    }

    /// Number of fetches started, including those still held
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn release(&self, fetches: usize) {
        self.gate.add_permits(fetches);
    }
}

#[async_trait]
impl RequiredVersionSource for HeldSource {
    async fn fetch_required_version(&self) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate
            .acquire()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?
            .forget();
        Ok(self.version.clone())
    }
}

/// Source failing with a transport error
pub struct FailingSource;

#[async_trait]
impl RequiredVersionSource for FailingSource {
    async fn fetch_required_version(&self) -> Result<String, FetchError> {
        Err(FetchError::Transport("connection refused".to_string()))
    }
}

/// Holds a prompt open until released
#[derive(Default)]
pub struct PromptHold {
    pub shown: Notify,
    pub release: Notify,
}

/// Presenter answering from a script.
///
/// An exhausted script is an error so a broken loop fails instead of hanging.
pub struct ScriptedPresenter {
    outcomes: Mutex<VecDeque<PromptOutcome>>,
    allow_cancel_seen: Mutex<Vec<bool>>,
    hold: Option<Arc<PromptHold>>,
}

impl ScriptedPresenter {
    pub fn new(outcomes: Vec<PromptOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            allow_cancel_seen: Mutex::new(Vec::new()),
            hold: None,
        }
    }

    pub fn held(outcomes: Vec<PromptOutcome>, hold: Arc<PromptHold>) -> Self {
        Self {
            hold: Some(hold),
            ..Self::new(outcomes)
        }
    }

    pub fn calls(&self) -> usize {
        self.allow_cancel_seen.lock().unwrap().len()
    }

    pub fn allow_cancel_seen(&self) -> Vec<bool> {
        self.allow_cancel_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl PromptPresenter for ScriptedPresenter {
    async fn show_prompt(&self, allow_cancel: bool) -> Result<PromptOutcome, PromptError> {
        self.allow_cancel_seen.lock().unwrap().push(allow_cancel);
        if let Some(hold) = &self.hold {
            hold.shown.notify_one();
            hold.release.notified().await;
        }
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| PromptError::Unavailable("script exhausted".to_string()))
    }
}

/// Launcher recording every URL it was asked to open
#[derive(Default)]
pub struct RecordingLauncher {
    urls: Mutex<Vec<String>>,
}

impl RecordingLauncher {
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StoreLauncher for RecordingLauncher {
    async fn open_store_listing(&self, url: &str) -> Result<(), StoreOpenError> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// Launcher that cannot open anything
pub struct FailingLauncher;

#[async_trait]
impl StoreLauncher for FailingLauncher {
    async fn open_store_listing(&self, url: &str) -> Result<(), StoreOpenError> {
        Err(StoreOpenError {
            url: url.to_string(),
            reason: "no store app installed".to_string(),
        })
    }
}

pub fn options(allow_cancel: bool) -> PrompterOptions {
    PrompterOptions {
        allow_cancel,
        ios_app_store_id: "1234567890".to_string(),
        android_package_name: None,
    }
}

/// Build a prompter for a local build at `local_version`
pub fn build_prompter(
    options: PrompterOptions,
    platform: PlatformKind,
    local_version: &str,
    source: Arc<dyn RequiredVersionSource>,
    presenter: Arc<ScriptedPresenter>,
    launcher: Arc<dyn StoreLauncher>,
) -> UpdatePrompter {
    let package_info = Arc::new(CachedPackageInfo::new(Arc::new(StaticPackageInfo::new(
        PackageInfo::new(local_version, PACKAGE_ID),
    ))));
    UpdatePrompter::new(options, package_info, source, presenter, launcher).with_platform(platform)
}

/// Poll `condition` until it holds or a second has passed
pub async fn wait_until(condition: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
