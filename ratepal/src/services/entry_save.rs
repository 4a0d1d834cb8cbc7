//! Entry save orchestration
//!
//! Writes an entry's scalar attributes, then reconciles every custom field
//! of its list against the entry's stored values: existing values are
//! updated in place, missing ones are created. Field writes run
//! concurrently and the save succeeds only if all of them do.
//!
//! There is no cross-record transaction. If a field write fails after the
//! entry row was written, the entry row stays as written.

use super::form::EntryDraft;
use crate::database::{
    ActorId, CreateEntryRequest, Entry, EntryStore, FieldValue, UpdateEntryRequest,
};
use crate::error::{AppError, Result};
use crate::fields::value::parse_number;
use crate::fields::{FieldDefinition, FieldInput};
use futures::future::try_join_all;
use std::collections::HashMap;

/// Result of a successful save
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub entry: Entry,
    /// Field values inserted by this save
    pub created: usize,
    /// Field values overwritten by this save
    pub updated: usize,
}

enum Reconciled {
    Created,
    Updated,
}

/// Persist a validated draft for a list.
///
/// Creates the entry when `draft.entry_id` is `None` (owned by `actor`, or a
/// guest row without one), otherwise overwrites the existing entry, which
/// must belong to `list_id`.
pub async fn save_entry<S>(
    store: &S,
    actor: Option<&ActorId>,
    list_id: &str,
    fields: &[FieldDefinition],
    draft: &EntryDraft,
) -> Result<SaveOutcome>
where
    S: EntryStore + ?Sized,
{
    let title = draft.title.trim().to_string();
    let description = Some(draft.description.trim())
        .filter(|d| !d.is_empty())
        .map(String::from);
    let rating = if draft.rating.trim().is_empty() {
        None
    } else {
        Some(parse_number(&draft.rating).ok_or_else(|| {
            AppError::InvalidValue(format!("rating '{}' is not a number", draft.rating.trim()))
        })?)
    };

    // Serialize before writing anything so a bad value cannot leave a
    // half-saved entry behind.
    let planned = fields
        .iter()
        .map(|field| {
            let value = draft
                .value(&field.id)
                .cloned()
                .unwrap_or_else(|| FieldInput::empty(field.field_type));
            if value.field_type() != field.field_type {
                return Err(AppError::InvalidValue(format!(
                    "{} expects a {} value",
                    field.name,
                    field.field_type.label()
                )));
            }
            Ok((field, value.serialize()?))
        })
        .collect::<Result<Vec<_>>>()?;

    let entry = match &draft.entry_id {
        Some(id) => {
            let current = store.get_entry(id).await?;
            if current.list_id != list_id {
                return Err(AppError::EntryNotFound(id.clone()));
            }

            store
                .update_entry(&UpdateEntryRequest {
                    id: id.clone(),
                    title,
                    description,
                    rating,
                })
                .await?
        }
        None => {
            store
                .create_entry(&CreateEntryRequest {
                    list_id: list_id.to_string(),
                    user_id: actor.map(|a| a.as_str().to_string()),
                    title,
                    description,
                    rating,
                })
                .await?
        }
    };

    let existing = store.field_values(&entry.id).await?;
    let by_field: HashMap<&str, &FieldValue> = existing
        .iter()
        .map(|v| (v.field_id.as_str(), v))
        .collect();

    let writes = planned.iter().map(|(field, slots)| {
        let current = by_field.get(field.id.as_str()).copied();
        let entry_id = entry.id.as_str();
        async move {
            match current {
                Some(value) => {
                    store.update_field_value(&value.id, slots).await?;
                    Ok::<_, AppError>(Reconciled::Updated)
                }
                None => {
                    store.create_field_value(entry_id, &field.id, slots).await?;
                    Ok(Reconciled::Created)
                }
            }
        }
    });

    let results = try_join_all(writes).await.map_err(|e| {
        tracing::warn!("Saving fields of entry {} failed: {}", entry.id, e);
        e
    })?;

    let created = results
        .iter()
        .filter(|r| matches!(r, Reconciled::Created))
        .count();
    let updated = results.len() - created;

    tracing::debug!(
        "Saved entry {}: {} field values created, {} updated",
        entry.id,
        created,
        updated
    );

    Ok(SaveOutcome {
        entry,
        created,
        updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_memory_pool, CreateListRequest, Repository};
    use crate::fields::{FieldType, ValueSlots};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Wraps a repository, counting field writes and failing on request
    struct RecordingStore {
        inner: Repository,
        creates: AtomicUsize,
        updates: AtomicUsize,
        fail_field: Option<String>,
        fail_update: bool,
    }

    impl RecordingStore {
        fn new(inner: Repository) -> Self {
            Self {
                inner,
                creates: AtomicUsize::new(0),
                updates: AtomicUsize::new(0),
                fail_field: None,
                fail_update: false,
            }
        }
    }

    #[async_trait]
    impl EntryStore for RecordingStore {
        async fn get_entry(&self, id: &str) -> Result<Entry> {
            self.inner.get_entry(id).await
        }

        async fn create_entry(&self, req: &CreateEntryRequest) -> Result<Entry> {
            self.inner.create_entry(req).await
        }

        async fn update_entry(&self, req: &UpdateEntryRequest) -> Result<Entry> {
            self.inner.update_entry(req).await
        }

        async fn field_values(&self, entry_id: &str) -> Result<Vec<FieldValue>> {
            self.inner.list_field_values(entry_id).await
        }

        async fn create_field_value(
            &self,
            entry_id: &str,
            field_id: &str,
            slots: &ValueSlots,
        ) -> Result<FieldValue> {
            if self.fail_field.as_deref() == Some(field_id) {
                return Err(AppError::Generic("network down".to_string()));
            }
            self.creates.fetch_add(1, Ordering::SeqCst);
            self.inner.create_field_value(entry_id, field_id, slots).await
        }

        async fn update_field_value(&self, id: &str, slots: &ValueSlots) -> Result<FieldValue> {
            if self.fail_update {
                return Err(AppError::Generic("network down".to_string()));
            }
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.inner.update_field_value(id, slots).await
        }
    }

    struct Fixture {
        repo: Repository,
        list_id: String,
        fields: Vec<FieldDefinition>,
    }

    async fn fixture() -> Fixture {
        let repo = Repository::new(create_memory_pool().await.unwrap());
        let list = repo
            .create_list(
                &CreateListRequest {
                    title: "Restaurants".to_string(),
                    description: None,
                    is_public: false,
                    rating_system_id: None,
                },
                None,
                1,
            )
            .await
            .unwrap();

        let mut rows = Vec::new();
        for (position, (name, type_id)) in [("Cuisine", 1), ("Price", 2), ("Visited", 4)]
            .into_iter()
            .enumerate()
        {
            rows.push(
                repo.create_custom_field(&list.id, type_id, name, None, false, position as i64 + 1)
                    .await
                    .unwrap(),
            );
        }

        Fixture {
            list_id: list.id,
            fields: FieldDefinition::from_rows(&rows).unwrap(),
            repo,
        }
    }

    fn filled_draft(fields: &[FieldDefinition]) -> EntryDraft {
        EntryDraft::blank(fields)
            .with_title("Luigi's")
            .with_rating("4.5")
            .with_value(fields[0].id.clone(), FieldInput::Text("Italian".to_string()))
            .with_value(fields[1].id.clone(), FieldInput::Number("25".to_string()))
            .with_value(fields[2].id.clone(), FieldInput::Boolean(Some(true)))
    }

    #[tokio::test]
    async fn test_create_writes_every_field() {
        let fx = fixture().await;
        let store = RecordingStore::new(fx.repo.clone());
        let actor = ActorId::new("user-1");

        let outcome = save_entry(&store, Some(&actor), &fx.list_id, &fx.fields, &filled_draft(&fx.fields))
            .await
            .unwrap();

        assert_eq!(outcome.created, 3);
        assert_eq!(outcome.updated, 0);
        assert_eq!(outcome.entry.user_id.as_deref(), Some("user-1"));
        assert_eq!(outcome.entry.rating, Some(4.5));
        assert_eq!(fx.repo.list_field_values(&outcome.entry.id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_guest_entry_has_no_owner() {
        let fx = fixture().await;

        let outcome = save_entry(&fx.repo, None, &fx.list_id, &fx.fields, &filled_draft(&fx.fields))
            .await
            .unwrap();

        assert!(outcome.entry.user_id.is_none());
    }

    #[tokio::test]
    async fn test_one_existing_value_gives_one_update_two_creates() {
        let fx = fixture().await;
        let entry = fx
            .repo
            .create_entry(&CreateEntryRequest {
                list_id: fx.list_id.clone(),
                user_id: None,
                title: "Luigi's".to_string(),
                description: None,
                rating: Some(3.0),
            })
            .await
            .unwrap();
        fx.repo
            .create_field_value(&entry.id, &fx.fields[0].id, &ValueSlots::text("Pizza".to_string()))
            .await
            .unwrap();

        let store = RecordingStore::new(fx.repo.clone());
        let mut draft = filled_draft(&fx.fields);
        draft.entry_id = Some(entry.id.clone());

        let outcome = save_entry(&store, None, &fx.list_id, &fx.fields, &draft)
            .await
            .unwrap();

        assert_eq!(store.updates.load(Ordering::SeqCst), 1);
        assert_eq!(store.creates.load(Ordering::SeqCst), 2);
        assert_eq!(outcome.updated, 1);
        assert_eq!(outcome.created, 2);

        let values = fx.repo.list_field_values(&entry.id).await.unwrap();
        assert_eq!(values.len(), 3);
        let cuisine = values.iter().find(|v| v.field_id == fx.fields[0].id).unwrap();
        assert_eq!(cuisine.value_text.as_deref(), Some("Italian"));
    }

    #[tokio::test]
    async fn test_resave_updates_in_place() {
        let fx = fixture().await;
        let first = save_entry(&fx.repo, None, &fx.list_id, &fx.fields, &filled_draft(&fx.fields))
            .await
            .unwrap();

        let mut draft = filled_draft(&fx.fields);
        draft.entry_id = Some(first.entry.id.clone());
        draft.set(fx.fields[1].id.clone(), FieldInput::Number(String::new()));

        let second = save_entry(&fx.repo, None, &fx.list_id, &fx.fields, &draft)
            .await
            .unwrap();

        assert_eq!(second.created, 0);
        assert_eq!(second.updated, 3);

        let values = fx.repo.list_field_values(&first.entry.id).await.unwrap();
        assert_eq!(values.len(), 3);
        let price = values.iter().find(|v| v.field_id == fx.fields[1].id).unwrap();
        assert!(price.slots().is_cleared());
    }

    #[tokio::test]
    async fn test_single_failed_write_fails_save() {
        let fx = fixture().await;
        let mut store = RecordingStore::new(fx.repo.clone());
        store.fail_field = Some(fx.fields[1].id.clone());

        let result = save_entry(&store, None, &fx.list_id, &fx.fields, &filled_draft(&fx.fields)).await;

        assert!(matches!(result, Err(AppError::Generic(_))));
        // The entry row is not rolled back
        assert_eq!(fx.repo.list_entries(&fx.list_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bad_value_rejected_before_any_write() {
        let fx = fixture().await;
        let draft = filled_draft(&fx.fields)
            .with_value(fx.fields[1].id.clone(), FieldInput::Number("cheap".to_string()));

        let result = save_entry(&fx.repo, None, &fx.list_id, &fx.fields, &draft).await;

        assert!(matches!(result, Err(AppError::InvalidValue(_))));
        assert!(fx.repo.list_entries(&fx.list_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_entry_is_not_found() {
        let fx = fixture().await;
        let mut draft = filled_draft(&fx.fields);
        draft.entry_id = Some("missing".to_string());

        let result = save_entry(&fx.repo, None, &fx.list_id, &fx.fields, &draft).await;

        assert!(matches!(result, Err(AppError::EntryNotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_update_fails_save() {
        let fx = fixture().await;
        let entry = fx
            .repo
            .create_entry(&CreateEntryRequest {
                list_id: fx.list_id.clone(),
                user_id: None,
                title: "Luigi's".to_string(),
                description: None,
                rating: Some(3.0),
            })
            .await
            .unwrap();
        fx.repo
            .create_field_value(&entry.id, &fx.fields[0].id, &ValueSlots::text("Pizza".to_string()))
            .await
            .unwrap();

        let mut store = RecordingStore::new(fx.repo.clone());
        store.fail_update = true;
        let mut draft = filled_draft(&fx.fields);
        draft.entry_id = Some(entry.id.clone());

        let result = save_entry(&store, None, &fx.list_id, &fx.fields, &draft).await;

        assert!(matches!(result, Err(AppError::Generic(_))));
        let values = fx.repo.list_field_values(&entry.id).await.unwrap();
        let cuisine = values.iter().find(|v| v.field_id == fx.fields[0].id).unwrap();
        assert_eq!(cuisine.value_text.as_deref(), Some("Pizza"));
    }

    #[tokio::test]
    async fn test_entry_of_another_list_is_not_overwritten() {
        let fx = fixture().await;
        let other = fx
            .repo
            .create_list(
                &CreateListRequest {
                    title: "Bars".to_string(),
                    description: None,
                    is_public: false,
                    rating_system_id: None,
                },
                None,
                1,
            )
            .await
            .unwrap();
        let foreign = fx
            .repo
            .create_entry(&CreateEntryRequest {
                list_id: other.id.clone(),
                user_id: None,
                title: "Corner pub".to_string(),
                description: None,
                rating: Some(2.0),
            })
            .await
            .unwrap();

        let mut draft = filled_draft(&fx.fields);
        draft.entry_id = Some(foreign.id.clone());

        let result = save_entry(&fx.repo, None, &fx.list_id, &fx.fields, &draft).await;

        assert!(matches!(result, Err(AppError::EntryNotFound(_))));
        let unchanged = fx.repo.get_entry(&foreign.id).await.unwrap();
        assert_eq!(unchanged.title, "Corner pub");
        assert!(fx.repo.list_field_values(&foreign.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_multi_select_scenario() {
        let repo = Repository::new(create_memory_pool().await.unwrap());
        let list = repo
            .create_list(
                &CreateListRequest {
                    title: "Tagged".to_string(),
                    description: None,
                    is_public: false,
                    rating_system_id: None,
                },
                None,
                1,
            )
            .await
            .unwrap();
        let row = repo
            .create_custom_field(&list.id, FieldType::MultiSelect.id(), "Tags", Some(r#"["A","B","C"]"#), true, 1)
            .await
            .unwrap();
        let fields = FieldDefinition::from_rows(&[row]).unwrap();

        let draft = EntryDraft::blank(&fields)
            .with_title("Thing")
            .with_rating("3")
            .with_value(
                fields[0].id.clone(),
                FieldInput::MultiSelect(vec!["B".to_string(), "A".to_string()]),
            );

        let outcome = save_entry(&repo, None, &list.id, &fields, &draft).await.unwrap();

        let values = repo.list_field_values(&outcome.entry.id).await.unwrap();
        assert_eq!(values[0].value_text.as_deref(), Some("B,A"));

        let reloaded = EntryDraft::from_entry(&fields, &outcome.entry, &values);
        assert_eq!(
            reloaded.value(&fields[0].id),
            Some(&FieldInput::MultiSelect(vec!["B".to_string(), "A".to_string()]))
        );
    }
}
