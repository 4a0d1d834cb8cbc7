//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::database::{self, ActorId, Repository};
use crate::error::Result;
use crate::services::{EntriesService, FieldsService, ListsService, RatingsService};
use crate::settings::{AppSettings, SettingsService};
use std::path::PathBuf;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub settings: AppSettings,
    /// Acting user for every write made through this state
    pub actor: Option<ActorId>,
    pub repo: Repository,
    pub lists: ListsService,
    pub fields: FieldsService,
    pub ratings: RatingsService,
    pub entries: EntriesService,
}

impl AppState {
    /// Load settings from `data_dir`, open the database and build the services
    pub async fn initialize(data_dir: PathBuf) -> Result<Self> {
        tracing::info!("Initializing application");
        tracing::info!("Data directory: {:?}", data_dir);

        std::fs::create_dir_all(&data_dir)?;

        let settings = SettingsService::new(data_dir.clone()).load().await?;
        let db_path = settings.database_path(&data_dir);
        let pool = database::create_pool(&db_path).await?;

        let state = Self::with_repository(data_dir, settings, Repository::new(pool));

        match &state.actor {
            Some(actor) => tracing::info!("Acting as user {}", actor),
            None => tracing::info!("No user configured, writes are stored as guest rows"),
        }

        tracing::info!("Application initialized successfully");

        Ok(state)
    }

    /// Build the services over an existing repository
    pub fn with_repository(data_dir: PathBuf, settings: AppSettings, repo: Repository) -> Self {
        let actor = settings.actor();

        Self {
            data_dir,
            actor,
            settings,
            lists: ListsService::new(repo.clone()),
            fields: FieldsService::new(repo.clone()),
            ratings: RatingsService::new(repo.clone()),
            entries: EntriesService::new(repo.clone()),
            repo,
        }
    }

    pub fn actor(&self) -> Option<&ActorId> {
        self.actor.as_ref()
    }
}
