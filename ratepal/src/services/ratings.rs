//! Rating systems service
//!
//! Lists the available rating systems and manages which one a list uses.

use crate::database::{ListRatingSettings, RatingSystem, Repository};
use crate::error::Result;
use serde::Serialize;

/// How a rating is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingDisplay {
    Stars,
    Number,
    Emoji,
    Slider,
}

impl RatingSystem {
    /// Display style; unrecognised values render as plain numbers
    pub fn display(&self) -> RatingDisplay {
        match self.display_type.as_str() {
            "stars" => RatingDisplay::Stars,
            "emoji" => RatingDisplay::Emoji,
            "slider" | "percentage" => RatingDisplay::Slider,
            _ => RatingDisplay::Number,
        }
    }

    pub fn tier_labels(&self) -> Vec<String> {
        self.tier_labels
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }

    pub fn contains(&self, rating: f64) -> bool {
        rating >= self.min_value && rating <= self.max_value
    }

    /// Label of the tier a rating falls into, spreading tiers evenly over
    /// the range
    pub fn tier_label(&self, rating: f64) -> Option<String> {
        let labels = self.tier_labels();
        if labels.is_empty() || !self.contains(rating) {
            return None;
        }

        let span = self.max_value - self.min_value;
        let fraction = if span > 0.0 {
            (rating - self.min_value) / span
        } else {
            0.0
        };
        let index = (fraction * (labels.len() - 1) as f64).round() as usize;

        labels.get(index).cloned()
    }
}

/// Service for rating systems and list bindings
#[derive(Clone)]
pub struct RatingsService {
    repo: Repository,
}

impl RatingsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn list_rating_systems(&self) -> Result<Vec<RatingSystem>> {
        self.repo.list_rating_systems().await
    }

    pub async fn get_rating_system(&self, id: i64) -> Result<RatingSystem> {
        self.repo.get_rating_system(id).await
    }

    /// Rating system bound to a list, if any
    pub async fn rating_system_for_list(&self, list_id: &str) -> Result<Option<RatingSystem>> {
        self.repo.get_list_rating_system(list_id).await
    }

    /// Switch a list to another rating system
    pub async fn set_rating_system(
        &self,
        list_id: &str,
        rating_system_id: i64,
    ) -> Result<ListRatingSettings> {
        self.repo.get_list(list_id).await?;
        let system = self.repo.get_rating_system(rating_system_id).await?;

        tracing::info!("List {} switching to rating system '{}'", list_id, system.name);

        self.repo.set_list_rating_system(list_id, rating_system_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_memory_pool, CreateListRequest};
    use crate::error::AppError;

    fn five_stars() -> RatingSystem {
        RatingSystem {
            id: 1,
            name: "Five Stars".to_string(),
            min_value: 1.0,
            max_value: 5.0,
            step_value: 0.5,
            display_type: "stars".to_string(),
            tier_labels: Some(r#"["Poor","Fair","Good","Very Good","Excellent"]"#.to_string()),
        }
    }

    #[test]
    fn test_tier_labels() {
        let rs = five_stars();
        assert_eq!(rs.display(), RatingDisplay::Stars);
        assert_eq!(rs.tier_label(1.0).as_deref(), Some("Poor"));
        assert_eq!(rs.tier_label(3.0).as_deref(), Some("Good"));
        assert_eq!(rs.tier_label(5.0).as_deref(), Some("Excellent"));
        assert_eq!(rs.tier_label(6.0), None);
    }

    #[test]
    fn test_missing_or_malformed_labels() {
        let mut rs = five_stars();
        rs.tier_labels = Some("not json".to_string());
        assert!(rs.tier_labels().is_empty());
        assert_eq!(rs.tier_label(3.0), None);

        rs.display_type = "dial".to_string();
        assert_eq!(rs.display(), RatingDisplay::Number);
    }

    #[tokio::test]
    async fn test_set_rating_system() {
        let repo = Repository::new(create_memory_pool().await.unwrap());
        let service = RatingsService::new(repo.clone());
        let list = repo
            .create_list(
                &CreateListRequest {
                    title: "Movies".to_string(),
                    description: None,
                    is_public: true,
                    rating_system_id: None,
                },
                None,
                1,
            )
            .await
            .unwrap();

        assert_eq!(service.list_rating_systems().await.unwrap().len(), 4);

        service.set_rating_system(&list.id, 2).await.unwrap();
        let bound = service.rating_system_for_list(&list.id).await.unwrap().unwrap();
        assert_eq!(bound.name, "Ten Point");

        let missing = service.set_rating_system(&list.id, 42).await;
        assert!(matches!(missing, Err(AppError::RatingSystemNotFound(42))));
    }
}
