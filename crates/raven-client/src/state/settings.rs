//! Persistent UI state
//!
//! Saves layout preferences to a local JSON file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Layout preferences restored on startup
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    /// Whether the channel members panel is shown
    #[serde(default)]
    pub members_panel_open: bool,
    /// Last opened channel
    #[serde(default)]
    pub last_channel_id: Option<String>,
}

impl UiState {
    /// Get the state file path
    fn state_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("raven").join("ui_state.json"))
    }

    /// Load state from disk
    pub fn load() -> Self {
        let Some(path) = Self::state_path() else {
            tracing::warn!("Could not determine config directory");
            return Self::default();
        };

        Self::load_from(&path)
    }

    fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("UI state file does not exist, using defaults");
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(state) => {
                    tracing::info!("Loaded UI state from {:?}", path);
                    state
                }
                Err(e) => {
                    tracing::error!("Failed to parse UI state file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!("Failed to read UI state file: {}", e);
                Self::default()
            }
        }
    }

    /// Save state to disk
    pub fn save(&self) {
        let Some(path) = Self::state_path() else {
            tracing::warn!("Could not determine config directory");
            return;
        };

        self.save_to(&path);
    }

    fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::error!("Failed to create config directory: {}", e);
                return;
            }
        }

        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    tracing::error!("Failed to write UI state file: {}", e);
                } else {
                    tracing::debug!("Saved UI state to {:?}", path);
                }
            }
            Err(e) => {
                tracing::error!("Failed to serialize UI state: {}", e);
            }
        }
    }
}
