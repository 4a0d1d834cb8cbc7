//! Settings service
//!
//! Manages application settings persistence using JSON file storage.

use crate::config::{DATABASE_FILE_NAME, SETTINGS_FILE_NAME};
use crate::database::ActorId;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Database file; defaults to `ratepal.db` in the data directory
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// User id stamped on new lists and entries. Unset means guest rows.
    #[serde(default)]
    pub actor_id: Option<String>,
    /// tracing filter directive used when RUST_LOG is unset
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl AppSettings {
    /// Resolved database location for a data directory
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        match &self.database_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => data_dir.join(path),
            None => data_dir.join(DATABASE_FILE_NAME),
        }
    }

    /// Acting user, ignoring blank ids
    pub fn actor(&self) -> Option<ActorId> {
        self.actor_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ActorId::new)
    }
}

/// Service for managing application settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            settings_path: data_dir.join(SETTINGS_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<AppSettings> {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, creating default settings");
            let default = AppSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Settings(format!("Failed to parse settings: {}", e)))?;

        Ok(settings)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| AppError::Settings(format!("Failed to serialize settings: {}", e)))?;

        fs::write(&self.settings_path, content).await?;

        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    /// Change the acting user
    pub async fn set_actor(&self, actor_id: Option<String>) -> Result<()> {
        let mut settings = self.load().await?;
        settings.actor_id = actor_id;
        self.save(&settings).await
    }
}
