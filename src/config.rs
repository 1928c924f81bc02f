use serde::Deserialize;
use std::path::{Path, PathBuf};

// =============================================================================
// Remote version constants
// =============================================================================

/// Default JSON field holding the required version in the remote document
pub const DEFAULT_REMOTE_VERSION_FIELD: &str = "required_version";

/// Timeout for the remote version fetch in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

// =============================================================================
// Store listing constants
// =============================================================================

/// App Store listing prefix, followed by the numeric app id
pub const APP_STORE_URL_BASE: &str = "https://apps.apple.com/app/id";

/// Play Store listing prefix, followed by the package name as `id` query
pub const PLAY_STORE_URL_BASE: &str = "https://play.google.com/store/apps/details";

/// Gate configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GateConfig {
    /// Whether the user may dismiss the update prompt without updating
    pub allow_cancel: bool,
    /// Numeric App Store id; empty disables gating on iOS
    pub ios_app_store_id: String,
    /// Overrides the package id read from local metadata on Android
    pub android_package_name: Option<String>,
    /// Endpoint serving the required version document
    pub remote_version_url: Option<String>,
    /// Field of the remote document holding the required version
    pub remote_version_field: String,
    pub prompt: PromptText,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            allow_cancel: false,
            ios_app_store_id: String::new(),
            android_package_name: None,
            remote_version_url: None,
            remote_version_field: DEFAULT_REMOTE_VERSION_FIELD.to_string(),
            prompt: PromptText::default(),
        }
    }
}

impl GateConfig {
    /// Load configuration from a JSON file.
    ///
    /// A missing file yields the default configuration.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Text shown by the update prompt
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PromptText {
    pub title: String,
    pub content: String,
    pub update_button: String,
    pub cancel_button: String,
}

impl Default for PromptText {
    fn default() -> Self {
        Self {
            title: "App Update Required".to_string(),
            content: "Please update to continue using the app.".to_string(),
            update_button: "Update Now".to_string(),
            cancel_button: "Not now".to_string(),
        }
    }
}

/// Returns the path to the data directory for update-gate.
/// Uses $XDG_DATA_HOME/update-gate if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/update-gate,
/// or ./update-gate if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("update-gate.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("update-gate")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn gate_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<GateConfig>(json!({
            "allowCancel": true
        }))
        .unwrap();

        assert!(result.allow_cancel);
        assert_eq!(result.ios_app_store_id, "");
        assert_eq!(result.remote_version_field, DEFAULT_REMOTE_VERSION_FIELD);
        assert_eq!(result.prompt, PromptText::default());
    }

    #[test]
    fn gate_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<GateConfig>(json!({
            "allowCancel": false,
            "iosAppStoreId": "1234567890",
            "androidPackageName": "com.example.app",
            "remoteVersionUrl": "https://config.example.com/app.json",
            "remoteVersionField": "min_version",
            "prompt": {
                "title": "Update",
                "content": "New version available",
                "updateButton": "Go",
                "cancelButton": "Later"
            }
        }))
        .unwrap();

        assert_eq!(
            result,
            GateConfig {
                allow_cancel: false,
                ios_app_store_id: "1234567890".to_string(),
                android_package_name: Some("com.example.app".to_string()),
                remote_version_url: Some("https://config.example.com/app.json".to_string()),
                remote_version_field: "min_version".to_string(),
                prompt: PromptText {
                    title: "Update".to_string(),
                    content: "New version available".to_string(),
                    update_button: "Go".to_string(),
                    cancel_button: "Later".to_string(),
                },
            }
        );
    }

    #[test]
    fn load_returns_defaults_when_file_is_missing() {
        let temp_dir = TempDir::new().unwrap();

        let result = GateConfig::load(&temp_dir.path().join("missing.json")).unwrap();

        assert_eq!(result, GateConfig::default());
    }

    #[test]
    fn load_reads_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gate.json");
        std::fs::write(&path, r#"{"iosAppStoreId": "42"}"#).unwrap();

        let result = GateConfig::load(&path).unwrap();

        assert_eq!(result.ios_app_store_id, "42");
        assert!(!result.allow_cancel);
    }

    #[test]
    fn load_fails_on_malformed_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gate.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(GateConfig::load(&path).is_err());
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/update-gate"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/update-gate"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./update-gate"));
    }
}
