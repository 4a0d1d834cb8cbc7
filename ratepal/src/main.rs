// RatePal - rated lists with custom fields
// Entry point: opens the data directory and prints an overview of its lists

use anyhow::Context;
use ratepal::app::AppState;
use ratepal::config::{DATA_DIR_ENV, DEFAULT_LOG_FILTER};
use ratepal::settings::SettingsService;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(DATA_DIR_ENV).ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let settings = SettingsService::new(data_dir.clone())
        .load()
        .await
        .with_context(|| format!("failed to load settings from {}", data_dir.display()))?;

    // Initialize logging
    let fallback = settings
        .log_filter
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RatePal");

    let state = AppState::initialize(data_dir)
        .await
        .context("failed to initialize application state")?;

    let lists = state.lists.list_lists().await?;
    tracing::info!("{} lists", lists.len());

    for list in lists {
        let summary = state.lists.summary(&list.id).await?;
        let fields = state.fields.list_fields(&list.id).await?;
        let rating_system = state.ratings.rating_system_for_list(&list.id).await?;

        tracing::info!(
            "{}: {} entries, {} fields, average rating {}, rated with {}",
            list.title,
            summary.entry_count,
            fields.len(),
            summary
                .average_rating
                .map(|r| format!("{:.1}", r))
                .unwrap_or_else(|| "-".to_string()),
            rating_system
                .map(|rs| rs.name)
                .unwrap_or_else(|| "default range".to_string()),
        );
    }

    Ok(())
}
