//! Custom fields service
//!
//! Manages the per-list field schema entries are validated against.

use crate::database::Repository;
use crate::error::{AppError, Result};
use crate::fields::{FieldDefinition, FieldSpec};
use std::collections::HashSet;

/// Service for managing a list's custom fields
#[derive(Clone)]
pub struct FieldsService {
    repo: Repository,
}

impl FieldsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Fields of a list in display order
    pub async fn list_fields(&self, list_id: &str) -> Result<Vec<FieldDefinition>> {
        let rows = self.repo.list_custom_fields(list_id).await?;
        FieldDefinition::from_rows(&rows)
    }

    pub async fn get_field(&self, id: &str) -> Result<FieldDefinition> {
        let row = self.repo.get_custom_field(id).await?;
        FieldDefinition::from_row(&row)
    }

    /// Append a field after the list's current last field
    pub async fn add_field(&self, list_id: &str, spec: FieldSpec) -> Result<FieldDefinition> {
        self.repo.get_list(list_id).await?;
        let (name, options) = spec.validate()?;
        let position = self.repo.next_field_position(list_id).await?;

        tracing::info!(
            "Adding {} field '{}' to list {} at position {}",
            spec.field_type,
            name,
            list_id,
            position
        );

        let row = self
            .repo
            .create_custom_field(
                list_id,
                spec.field_type.id(),
                &name,
                options.as_deref(),
                spec.required,
                position,
            )
            .await?;

        FieldDefinition::from_row(&row)
    }

    /// Replace a field's name, type, required flag and options.
    /// Values already stored for the field are left untouched.
    pub async fn update_field(&self, id: &str, spec: FieldSpec) -> Result<FieldDefinition> {
        let (name, options) = spec.validate()?;

        tracing::debug!("Updating field: {}", id);

        let row = self
            .repo
            .update_custom_field(
                id,
                spec.field_type.id(),
                &name,
                options.as_deref(),
                spec.required,
            )
            .await?;

        FieldDefinition::from_row(&row)
    }

    /// Delete a field and its stored values
    pub async fn delete_field(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting field: {}", id);
        self.repo.delete_custom_field(id).await
    }

    /// Reorder a list's fields. `field_ids` must name every field of the
    /// list exactly once.
    pub async fn reorder_fields(&self, list_id: &str, field_ids: &[String]) -> Result<Vec<FieldDefinition>> {
        let current = self.repo.list_custom_fields(list_id).await?;

        let wanted: HashSet<&str> = field_ids.iter().map(String::as_str).collect();
        let existing: HashSet<&str> = current.iter().map(|f| f.id.as_str()).collect();
        if wanted.len() != field_ids.len() || wanted != existing {
            return Err(AppError::InvalidInput(format!(
                "Reorder must name each of the {} fields of list {} exactly once",
                current.len(),
                list_id
            )));
        }

        self.repo.reorder_custom_fields(list_id, field_ids).await?;
        self.list_fields(list_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_memory_pool, CreateListRequest};
    use crate::fields::FieldType;

    async fn create_test_service() -> (FieldsService, Repository, String) {
        let repo = Repository::new(create_memory_pool().await.unwrap());
        let list = repo
            .create_list(
                &CreateListRequest {
                    title: "Coffee".to_string(),
                    description: None,
                    is_public: false,
                    rating_system_id: None,
                },
                None,
                1,
            )
            .await
            .unwrap();
        (FieldsService::new(repo.clone()), repo, list.id)
    }

    #[tokio::test]
    async fn test_add_field_appends() {
        let (service, _, list_id) = create_test_service().await;

        let roast = service
            .add_field(&list_id, FieldSpec::new("Roast", FieldType::Text))
            .await
            .unwrap();
        let origin = service
            .add_field(
                &list_id,
                FieldSpec::new("Origin", FieldType::Select).with_options(&["Ethiopia", "Peru"]),
            )
            .await
            .unwrap();

        assert_eq!(roast.position, 1);
        assert_eq!(origin.position, 2);
        assert_eq!(origin.options, vec!["Ethiopia", "Peru"]);
    }

    #[tokio::test]
    async fn test_add_field_after_delete_does_not_collide() {
        let (service, _, list_id) = create_test_service().await;

        let a = service.add_field(&list_id, FieldSpec::new("A", FieldType::Text)).await.unwrap();
        service.add_field(&list_id, FieldSpec::new("B", FieldType::Text)).await.unwrap();
        service.delete_field(&a.id).await.unwrap();

        let c = service.add_field(&list_id, FieldSpec::new("C", FieldType::Text)).await.unwrap();
        assert_eq!(c.position, 3);
    }

    #[tokio::test]
    async fn test_add_field_validation() {
        let (service, _, list_id) = create_test_service().await;

        let no_options = service
            .add_field(&list_id, FieldSpec::new("Origin", FieldType::Select))
            .await;
        assert!(matches!(no_options, Err(AppError::InvalidField(_))));

        let missing_list = service
            .add_field("nope", FieldSpec::new("Roast", FieldType::Text))
            .await;
        assert!(matches!(missing_list, Err(AppError::ListNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_field() {
        let (service, _, list_id) = create_test_service().await;
        let field = service
            .add_field(&list_id, FieldSpec::new("Roast", FieldType::Text))
            .await
            .unwrap();

        let updated = service
            .update_field(
                &field.id,
                FieldSpec::new("Roast level", FieldType::Select)
                    .required()
                    .with_options(&["Light", "Dark"]),
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Roast level");
        assert_eq!(updated.field_type, FieldType::Select);
        assert!(updated.required);
        assert_eq!(updated.position, field.position);
    }

    #[tokio::test]
    async fn test_reorder_fields() {
        let (service, _, list_id) = create_test_service().await;
        let a = service.add_field(&list_id, FieldSpec::new("A", FieldType::Text)).await.unwrap();
        let b = service.add_field(&list_id, FieldSpec::new("B", FieldType::Text)).await.unwrap();
        let c = service.add_field(&list_id, FieldSpec::new("C", FieldType::Text)).await.unwrap();

        let reordered = service
            .reorder_fields(&list_id, &[c.id.clone(), a.id.clone(), b.id.clone()])
            .await
            .unwrap();

        let names: Vec<&str> = reordered.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert_eq!(reordered[2].position, 3);

        let partial = service.reorder_fields(&list_id, &[a.id.clone()]).await;
        assert!(matches!(partial, Err(AppError::InvalidInput(_))));

        let duplicated = service
            .reorder_fields(&list_id, &[a.id.clone(), a.id.clone(), b.id.clone()])
            .await;
        assert!(matches!(duplicated, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_unknown_type_id_is_an_error() {
        let (service, repo, list_id) = create_test_service().await;
        repo.create_custom_field(&list_id, 99, "Mystery", None, false, 1)
            .await
            .unwrap();

        let result = service.list_fields(&list_id).await;
        assert!(matches!(result, Err(AppError::UnknownFieldType(_))));
    }
}
