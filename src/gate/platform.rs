//! Runtime platform detection and store listing URLs

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::config::{APP_STORE_URL_BASE, PLAY_STORE_URL_BASE};

static CURRENT_PLATFORM: OnceLock<PlatformKind> = OnceLock::new();

/// Platform the application runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    Ios,
    Android,
    Web,
    Windows,
    MacOs,
    Linux,
    Other,
}

impl PlatformKind {
    /// Returns the platform of the running process.
    ///
    /// Detected on first access and fixed for the lifetime of the process.
    pub fn current() -> Self {
        *CURRENT_PLATFORM.get_or_init(Self::detect)
    }

    fn detect() -> Self {
        if cfg!(target_os = "ios") {
            PlatformKind::Ios
        } else if cfg!(target_os = "android") {
            PlatformKind::Android
        } else if cfg!(target_family = "wasm") {
            PlatformKind::Web
        } else if cfg!(target_os = "windows") {
            PlatformKind::Windows
        } else if cfg!(target_os = "macos") {
            PlatformKind::MacOs
        } else if cfg!(target_os = "linux") {
            PlatformKind::Linux
        } else {
            PlatformKind::Other
        }
    }

    /// Whether forced updates are enforced on this platform.
    ///
    /// Only mobile store platforms are gated.
    pub fn is_gated(&self) -> bool {
        matches!(self, PlatformKind::Ios | PlatformKind::Android)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::Ios => "ios",
            PlatformKind::Android => "android",
            PlatformKind::Web => "web",
            PlatformKind::Windows => "windows",
            PlatformKind::MacOs => "macos",
            PlatformKind::Linux => "linux",
            PlatformKind::Other => "other",
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ios" => Ok(PlatformKind::Ios),
            "android" => Ok(PlatformKind::Android),
            "web" => Ok(PlatformKind::Web),
            "windows" => Ok(PlatformKind::Windows),
            "macos" => Ok(PlatformKind::MacOs),
            "linux" => Ok(PlatformKind::Linux),
            "other" => Ok(PlatformKind::Other),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}

/// Build the store listing URL for a platform.
///
/// - iOS: `https://apps.apple.com/app/id<ios_app_store_id>`, only when the id is non-empty
/// - Android: `https://play.google.com/store/apps/details?id=<android_package_name>`
/// - Anything else: `None`
pub fn store_url(
    platform: PlatformKind,
    ios_app_store_id: &str,
    android_package_name: &str,
) -> Option<String> {
    match platform {
        PlatformKind::Ios if !ios_app_store_id.is_empty() => {
            Some(format!("{}{}", APP_STORE_URL_BASE, ios_app_store_id))
        }
        PlatformKind::Android => {
            let encoded: String =
                url::form_urlencoded::byte_serialize(android_package_name.as_bytes()).collect();
            Some(format!("{}?id={}", PLAY_STORE_URL_BASE, encoded))
        }
        _ => None,
    }
}
