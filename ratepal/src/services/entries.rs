//! Entries service
//!
//! Loads entry forms, validates and saves submissions, and reads entries
//! back together with their custom field values.

use super::entry_save::{save_entry, SaveOutcome};
use super::form::EntryDraft;
use super::validation::{validate_entry, FormErrors};
use crate::database::{ActorId, Entry, FieldValue, Repository};
use crate::error::{AppError, Result};
use crate::fields::FieldDefinition;
use serde::Serialize;
use std::collections::HashMap;

/// Outcome of submitting an entry form
#[derive(Debug)]
pub enum Submission {
    Saved(SaveOutcome),
    /// Nothing was written
    Rejected(FormErrors),
}

impl Submission {
    pub fn is_saved(&self) -> bool {
        matches!(self, Submission::Saved(_))
    }
}

/// An entry with its stored field values
#[derive(Debug, Clone, Serialize)]
pub struct EntryWithValues {
    #[serde(flatten)]
    pub entry: Entry,
    pub values: Vec<FieldValue>,
}

/// Service for entry forms and entry reads
#[derive(Clone)]
pub struct EntriesService {
    repo: Repository,
}

impl EntriesService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    async fn fields(&self, list_id: &str) -> Result<Vec<FieldDefinition>> {
        let rows = self.repo.list_custom_fields(list_id).await?;
        FieldDefinition::from_rows(&rows)
    }

    /// Form for a new entry (`entry_id` is `None`) or for editing one
    pub async fn load_form(&self, list_id: &str, entry_id: Option<&str>) -> Result<EntryDraft> {
        self.repo.get_list(list_id).await?;
        let fields = self.fields(list_id).await?;

        let Some(entry_id) = entry_id else {
            return Ok(EntryDraft::blank(&fields));
        };

        let entry = self.entry_in_list(list_id, entry_id).await?;
        let values = self.repo.list_field_values(&entry.id).await?;

        Ok(EntryDraft::from_entry(&fields, &entry, &values))
    }

    /// Validate a draft without saving it
    pub async fn validate(&self, list_id: &str, draft: &EntryDraft) -> Result<FormErrors> {
        let fields = self.fields(list_id).await?;
        let rating_system = self.repo.get_list_rating_system(list_id).await?;

        Ok(validate_entry(&fields, rating_system.as_ref(), draft))
    }

    /// Validate and save a draft. Validation failures come back as
    /// [`Submission::Rejected`]; storage failures are errors.
    pub async fn submit(
        &self,
        actor: Option<&ActorId>,
        list_id: &str,
        draft: &EntryDraft,
    ) -> Result<Submission> {
        self.repo.get_list(list_id).await?;
        if let Some(entry_id) = &draft.entry_id {
            self.entry_in_list(list_id, entry_id).await?;
        }

        let fields = self.fields(list_id).await?;
        let rating_system = self.repo.get_list_rating_system(list_id).await?;

        let errors = validate_entry(&fields, rating_system.as_ref(), draft);
        if !errors.is_valid() {
            tracing::debug!(
                "Entry submission for list {} rejected with {} errors",
                list_id,
                errors.len()
            );
            return Ok(Submission::Rejected(errors));
        }

        let outcome = save_entry(&self.repo, actor, list_id, &fields, draft).await?;
        self.repo.touch_list(list_id).await?;

        tracing::info!("Entry saved: {}", outcome.entry.id);

        Ok(Submission::Saved(outcome))
    }

    pub async fn get_entry(&self, id: &str) -> Result<EntryWithValues> {
        let entry = self.repo.get_entry(id).await?;
        let values = self.repo.list_field_values(id).await?;
        Ok(EntryWithValues { entry, values })
    }

    /// Entries of a list, newest first, with values fetched in one query
    pub async fn list_entries(&self, list_id: &str) -> Result<Vec<EntryWithValues>> {
        let entries = self.repo.list_entries(list_id).await?;
        let ids: Vec<String> = entries.iter().map(|e| e.id.clone()).collect();
        let values = self.repo.list_field_values_for_entries(&ids).await?;

        let mut by_entry: HashMap<String, Vec<FieldValue>> = HashMap::new();
        for value in values {
            by_entry.entry(value.entry_id.clone()).or_default().push(value);
        }

        Ok(entries
            .into_iter()
            .map(|entry| {
                let values = by_entry.remove(&entry.id).unwrap_or_default();
                EntryWithValues { entry, values }
            })
            .collect())
    }

    /// Search entries of a list by title or description
    pub async fn search_entries(&self, list_id: &str, query: &str) -> Result<Vec<Entry>> {
        let all_entries = self.repo.list_entries(list_id).await?;

        let query_lower = query.trim().to_lowercase();

        let filtered: Vec<Entry> = all_entries
            .into_iter()
            .filter(|entry| {
                entry.title.to_lowercase().contains(&query_lower)
                    || entry
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&query_lower))
            })
            .collect();

        Ok(filtered)
    }

    /// Delete an entry and its values
    pub async fn delete_entry(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting entry: {}", id);

        let entry = self.repo.get_entry(id).await?;
        self.repo.delete_entry(id).await?;
        self.repo.touch_list(&entry.list_id).await?;

        Ok(())
    }

    async fn entry_in_list(&self, list_id: &str, entry_id: &str) -> Result<Entry> {
        let entry = self.repo.get_entry(entry_id).await?;
        if entry.list_id != list_id {
            return Err(AppError::EntryNotFound(entry_id.to_string()));
        }
        Ok(entry)
    }
}
