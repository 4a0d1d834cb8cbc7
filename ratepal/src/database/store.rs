//! Storage boundary for entry saves
//!
//! The save orchestrator only needs these six operations. [`Repository`]
//! implements them over SQLite; other backends (or test doubles) can too.

use super::models::{CreateEntryRequest, Entry, FieldValue, UpdateEntryRequest};
use super::repository::Repository;
use crate::error::Result;
use crate::fields::ValueSlots;
use async_trait::async_trait;

#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Select an entry by id
    async fn get_entry(&self, id: &str) -> Result<Entry>;

    /// Insert a new entry row
    async fn create_entry(&self, req: &CreateEntryRequest) -> Result<Entry>;

    /// Overwrite an entry's scalar attributes by id
    async fn update_entry(&self, req: &UpdateEntryRequest) -> Result<Entry>;

    /// Select the field values of an entry
    async fn field_values(&self, entry_id: &str) -> Result<Vec<FieldValue>>;

    /// Insert a field value linked to (entry, field)
    async fn create_field_value(
        &self,
        entry_id: &str,
        field_id: &str,
        slots: &ValueSlots,
    ) -> Result<FieldValue>;

    /// Overwrite a field value's slots by id
    async fn update_field_value(&self, id: &str, slots: &ValueSlots) -> Result<FieldValue>;
}

#[async_trait]
impl EntryStore for Repository {
    async fn get_entry(&self, id: &str) -> Result<Entry> {
        Repository::get_entry(self, id).await
    }

    async fn create_entry(&self, req: &CreateEntryRequest) -> Result<Entry> {
        Repository::create_entry(self, req).await
    }

    async fn update_entry(&self, req: &UpdateEntryRequest) -> Result<Entry> {
        Repository::update_entry(self, req).await
    }

    async fn field_values(&self, entry_id: &str) -> Result<Vec<FieldValue>> {
        self.list_field_values(entry_id).await
    }

    async fn create_field_value(
        &self,
        entry_id: &str,
        field_id: &str,
        slots: &ValueSlots,
    ) -> Result<FieldValue> {
        Repository::create_field_value(self, entry_id, field_id, slots).await
    }

    async fn update_field_value(&self, id: &str, slots: &ValueSlots) -> Result<FieldValue> {
        Repository::update_field_value(self, id, slots).await
    }
}
