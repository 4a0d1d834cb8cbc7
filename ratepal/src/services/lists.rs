//! Lists service
//!
//! List lifecycle: create (optionally from a built-in template), read,
//! update, delete, and the overview summary.

use crate::config::DEFAULT_RATING_SYSTEM_ID;
use crate::database::{
    ActorId, CreateListRequest, List, ListSummary, Repository, UpdateListRequest,
};
use crate::error::{AppError, Result};
use crate::fields::{FieldSpec, FieldType};

/// Built-in starting schemas offered when creating a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTemplate {
    Restaurants,
    Movies,
    Books,
}

impl ListTemplate {
    pub const ALL: [ListTemplate; 3] = [
        ListTemplate::Restaurants,
        ListTemplate::Movies,
        ListTemplate::Books,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ListTemplate::Restaurants => "Restaurants",
            ListTemplate::Movies => "Movies",
            ListTemplate::Books => "Books",
        }
    }

    pub fn fields(self) -> Vec<FieldSpec> {
        match self {
            ListTemplate::Restaurants => vec![
                FieldSpec::new("Cuisine", FieldType::Text).required(),
                FieldSpec::new("Price", FieldType::Number).required(),
                FieldSpec::new("Location", FieldType::Text),
            ],
            ListTemplate::Movies => vec![
                FieldSpec::new("Genre", FieldType::Text).required(),
                FieldSpec::new("Director", FieldType::Text).required(),
                FieldSpec::new("Year", FieldType::Number).required(),
            ],
            ListTemplate::Books => vec![
                FieldSpec::new("Author", FieldType::Text).required(),
                FieldSpec::new("Genre", FieldType::Text).required(),
                FieldSpec::new("Year", FieldType::Number),
            ],
        }
    }
}

/// Service for managing lists
#[derive(Clone)]
pub struct ListsService {
    repo: Repository,
}

impl ListsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Create a new list owned by `actor` (a guest list without one)
    pub async fn create_list(&self, actor: Option<&ActorId>, req: CreateListRequest) -> Result<List> {
        let title = req.title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidInput("List title is required".to_string()));
        }

        let rating_system_id = req.rating_system_id.unwrap_or(DEFAULT_RATING_SYSTEM_ID);
        self.repo.get_rating_system(rating_system_id).await?;

        tracing::info!("Creating new list: {}", title);

        let req = CreateListRequest {
            title: title.to_string(),
            description: clean_description(req.description.as_deref()),
            ..req
        };

        let list = self
            .repo
            .create_list(&req, actor.map(ActorId::as_str), rating_system_id)
            .await?;

        tracing::info!("List created successfully: {}", list.id);

        Ok(list)
    }

    /// Create a list pre-populated with a template's fields
    pub async fn create_from_template(
        &self,
        actor: Option<&ActorId>,
        template: ListTemplate,
        title: Option<String>,
    ) -> Result<List> {
        let list = self
            .create_list(
                actor,
                CreateListRequest {
                    title: title.unwrap_or_else(|| template.name().to_string()),
                    description: None,
                    is_public: false,
                    rating_system_id: None,
                },
            )
            .await?;

        for (index, spec) in template.fields().iter().enumerate() {
            let (name, options) = spec.validate()?;
            self.repo
                .create_custom_field(
                    &list.id,
                    spec.field_type.id(),
                    &name,
                    options.as_deref(),
                    spec.required,
                    index as i64 + 1,
                )
                .await?;
        }

        tracing::info!("Applied template {} to list {}", template.name(), list.id);

        Ok(list)
    }

    pub async fn get_list(&self, id: &str) -> Result<List> {
        self.repo.get_list(id).await
    }

    /// All lists, most recently updated first
    pub async fn list_lists(&self) -> Result<Vec<List>> {
        self.repo.list_lists().await
    }

    /// Update a list's title, description or visibility
    pub async fn update_list(&self, req: UpdateListRequest) -> Result<List> {
        tracing::debug!("Updating list: {}", req.id);

        let title = match req.title {
            Some(ref t) if t.trim().is_empty() => {
                return Err(AppError::InvalidInput("List title is required".to_string()))
            }
            Some(ref t) => Some(t.trim().to_string()),
            None => None,
        };

        let req = UpdateListRequest {
            title,
            description: req
                .description
                .as_ref()
                .map(|d| clean_description(d.as_deref())),
            ..req
        };

        self.repo.update_list(&req).await
    }

    /// Delete a list with everything in it
    pub async fn delete_list(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting list: {}", id);

        self.repo.delete_list(id).await?;

        tracing::info!("List deleted successfully: {}", id);

        Ok(())
    }

    /// Entry count, average rating and newest entry time
    pub async fn summary(&self, id: &str) -> Result<ListSummary> {
        self.repo.get_list(id).await?;
        self.repo.list_summary(id).await
    }
}

fn clean_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from)
}
