//! Repository layer for database operations
//!
//! This module provides CRUD operations for all entities: select by id,
//! select by foreign key (single and batch), insert, update by id and
//! delete by id. Multi-row writes run in a transaction.

use super::models::*;
use crate::error::{AppError, Result};
use crate::fields::ValueSlots;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ===== Lists =====

    /// Create a list and bind it to a rating system
    pub async fn create_list(
        &self,
        req: &CreateListRequest,
        user_id: Option<&str>,
        rating_system_id: i64,
    ) -> Result<List> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let list = sqlx::query_as::<_, List>(
            r#"
            INSERT INTO lists (id, user_id, title, description, is_public, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.is_public)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO list_rating_settings (list_id, rating_system_id, is_required, display_position)
            VALUES (?, ?, 1, 0)
            "#,
        )
        .bind(&id)
        .bind(rating_system_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Created list: {}", id);
        Ok(list)
    }

    /// Get a list by ID
    pub async fn get_list(&self, id: &str) -> Result<List> {
        sqlx::query_as::<_, List>("SELECT * FROM lists WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::ListNotFound(id.to_string()))
    }

    /// List all lists, most recently updated first
    pub async fn list_lists(&self) -> Result<Vec<List>> {
        let lists = sqlx::query_as::<_, List>("SELECT * FROM lists ORDER BY updated_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(lists)
    }

    /// Update a list
    pub async fn update_list(&self, req: &UpdateListRequest) -> Result<List> {
        let current = self.get_list(&req.id).await?;

        let title = req.title.clone().unwrap_or(current.title);
        let description = match &req.description {
            Some(d) => d.clone(),
            None => current.description,
        };
        let is_public = req.is_public.unwrap_or(current.is_public);

        let list = sqlx::query_as::<_, List>(
            r#"
            UPDATE lists SET title = ?, description = ?, is_public = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&title)
        .bind(&description)
        .bind(is_public)
        .bind(Utc::now())
        .bind(&req.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::ListNotFound(req.id.clone()))?;

        tracing::debug!("Updated list: {}", list.id);
        Ok(list)
    }

    /// Bump a list's `updated_at`
    pub async fn touch_list(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE lists SET updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a list with its fields, entries, values and rating settings
    pub async fn delete_list(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM field_values WHERE entry_id IN (SELECT id FROM entries WHERE list_id = ?)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        for table in ["entries", "custom_fields", "list_rating_settings"] {
            sqlx::query(&format!("DELETE FROM {} WHERE list_id = ?", table))
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        let rows = sqlx::query("DELETE FROM lists WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::ListNotFound(id.to_string()));
        }

        tx.commit().await?;

        tracing::debug!("Deleted list: {}", id);
        Ok(())
    }

    /// Entry count, average rating and newest entry time for a list
    pub async fn list_summary(&self, list_id: &str) -> Result<ListSummary> {
        let (entry_count, average_rating, last_entry_at): (i64, Option<f64>, Option<DateTime<Utc>>) =
            sqlx::query_as(
                r#"
                SELECT COUNT(*), AVG(rating), MAX(created_at)
                FROM entries WHERE list_id = ?
                "#,
            )
            .bind(list_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(ListSummary {
            list_id: list_id.to_string(),
            entry_count,
            average_rating,
            last_entry_at,
        })
    }

    // ===== Custom fields =====

    /// Create a custom field
    pub async fn create_custom_field(
        &self,
        list_id: &str,
        field_type_id: i64,
        name: &str,
        options: Option<&str>,
        is_required: bool,
        position: i64,
    ) -> Result<CustomField> {
        let id = Uuid::new_v4().to_string();

        let field = sqlx::query_as::<_, CustomField>(
            r#"
            INSERT INTO custom_fields (id, list_id, field_type_id, name, options, is_required, position)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(list_id)
        .bind(field_type_id)
        .bind(name)
        .bind(options)
        .bind(is_required)
        .bind(position)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created custom field: {} for list: {}", id, list_id);
        Ok(field)
    }

    /// Get a custom field by ID
    pub async fn get_custom_field(&self, id: &str) -> Result<CustomField> {
        sqlx::query_as::<_, CustomField>("SELECT * FROM custom_fields WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::FieldNotFound(id.to_string()))
    }

    /// List custom fields of a list in display order
    pub async fn list_custom_fields(&self, list_id: &str) -> Result<Vec<CustomField>> {
        let fields = sqlx::query_as::<_, CustomField>(
            "SELECT * FROM custom_fields WHERE list_id = ? ORDER BY position ASC",
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(fields)
    }

    /// Position one past the last field of a list
    pub async fn next_field_position(&self, list_id: &str) -> Result<i64> {
        let position: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position), 0) + 1 FROM custom_fields WHERE list_id = ?",
        )
        .bind(list_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(position)
    }

    /// Update a custom field's definition
    pub async fn update_custom_field(
        &self,
        id: &str,
        field_type_id: i64,
        name: &str,
        options: Option<&str>,
        is_required: bool,
    ) -> Result<CustomField> {
        let field = sqlx::query_as::<_, CustomField>(
            r#"
            UPDATE custom_fields SET field_type_id = ?, name = ?, options = ?, is_required = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(field_type_id)
        .bind(name)
        .bind(options)
        .bind(is_required)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::FieldNotFound(id.to_string()))?;

        tracing::debug!("Updated custom field: {}", id);
        Ok(field)
    }

    /// Rewrite positions 1..n following the given field order
    pub async fn reorder_custom_fields(&self, list_id: &str, field_ids: &[String]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for (index, field_id) in field_ids.iter().enumerate() {
            let rows = sqlx::query("UPDATE custom_fields SET position = ? WHERE id = ? AND list_id = ?")
                .bind(index as i64 + 1)
                .bind(field_id)
                .bind(list_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

            if rows == 0 {
                return Err(AppError::FieldNotFound(field_id.clone()));
            }
        }

        tx.commit().await?;

        tracing::debug!("Reordered {} fields of list: {}", field_ids.len(), list_id);
        Ok(())
    }

    /// Delete a custom field and every value stored for it
    pub async fn delete_custom_field(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM field_values WHERE field_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let rows = sqlx::query("DELETE FROM custom_fields WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::FieldNotFound(id.to_string()));
        }

        tx.commit().await?;

        tracing::debug!("Deleted custom field: {}", id);
        Ok(())
    }

    // ===== Entries =====

    /// Create an entry
    pub async fn create_entry(&self, req: &CreateEntryRequest) -> Result<Entry> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let entry = sqlx::query_as::<_, Entry>(
            r#"
            INSERT INTO entries (id, list_id, user_id, title, description, rating, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.list_id)
        .bind(&req.user_id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.rating)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created entry: {} in list: {}", id, req.list_id);
        Ok(entry)
    }

    /// Get an entry by ID
    pub async fn get_entry(&self, id: &str) -> Result<Entry> {
        sqlx::query_as::<_, Entry>("SELECT * FROM entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::EntryNotFound(id.to_string()))
    }

    /// List entries of a list, newest first
    pub async fn list_entries(&self, list_id: &str) -> Result<Vec<Entry>> {
        let entries = sqlx::query_as::<_, Entry>(
            "SELECT * FROM entries WHERE list_id = ? ORDER BY created_at DESC",
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Overwrite an entry's title, description and rating
    pub async fn update_entry(&self, req: &UpdateEntryRequest) -> Result<Entry> {
        let entry = sqlx::query_as::<_, Entry>(
            r#"
            UPDATE entries SET title = ?, description = ?, rating = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.rating)
        .bind(Utc::now())
        .bind(&req.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::EntryNotFound(req.id.clone()))?;

        tracing::debug!("Updated entry: {}", entry.id);
        Ok(entry)
    }

    /// Delete an entry and its field values
    pub async fn delete_entry(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM field_values WHERE entry_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let rows = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::EntryNotFound(id.to_string()));
        }

        tx.commit().await?;

        tracing::debug!("Deleted entry: {}", id);
        Ok(())
    }

    // ===== Field values =====

    /// Field values of one entry
    pub async fn list_field_values(&self, entry_id: &str) -> Result<Vec<FieldValue>> {
        let values = sqlx::query_as::<_, FieldValue>("SELECT * FROM field_values WHERE entry_id = ?")
            .bind(entry_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(values)
    }

    /// Field values of several entries in one query
    pub async fn list_field_values_for_entries(&self, entry_ids: &[String]) -> Result<Vec<FieldValue>> {
        if entry_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; entry_ids.len()].join(", ");
        let query = format!("SELECT * FROM field_values WHERE entry_id IN ({})", placeholders);

        let mut q = sqlx::query_as::<_, FieldValue>(&query);
        for id in entry_ids {
            q = q.bind(id);
        }

        let values = q.fetch_all(&self.pool).await?;

        Ok(values)
    }

    /// Create a field value for (entry, field)
    pub async fn create_field_value(
        &self,
        entry_id: &str,
        field_id: &str,
        slots: &ValueSlots,
    ) -> Result<FieldValue> {
        let id = Uuid::new_v4().to_string();

        let value = sqlx::query_as::<_, FieldValue>(
            r#"
            INSERT INTO field_values (id, entry_id, field_id, value_text, value_number, value_date, value_boolean)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(entry_id)
        .bind(field_id)
        .bind(&slots.text)
        .bind(slots.number)
        .bind(&slots.date)
        .bind(slots.boolean)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created field value: {} for entry: {}", id, entry_id);
        Ok(value)
    }

    /// Overwrite all typed slots of a field value
    pub async fn update_field_value(&self, id: &str, slots: &ValueSlots) -> Result<FieldValue> {
        let value = sqlx::query_as::<_, FieldValue>(
            r#"
            UPDATE field_values
            SET value_text = ?, value_number = ?, value_date = ?, value_boolean = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&slots.text)
        .bind(slots.number)
        .bind(&slots.date)
        .bind(slots.boolean)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::FieldValueNotFound(id.to_string()))?;

        tracing::debug!("Updated field value: {}", id);
        Ok(value)
    }

    /// Delete a field value
    pub async fn delete_field_value(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM field_values WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::FieldValueNotFound(id.to_string()));
        }

        tracing::debug!("Deleted field value: {}", id);
        Ok(())
    }

    // ===== Rating systems =====

    /// List all rating systems
    pub async fn list_rating_systems(&self) -> Result<Vec<RatingSystem>> {
        let systems = sqlx::query_as::<_, RatingSystem>("SELECT * FROM rating_systems ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(systems)
    }

    /// Get a rating system by ID
    pub async fn get_rating_system(&self, id: i64) -> Result<RatingSystem> {
        sqlx::query_as::<_, RatingSystem>("SELECT * FROM rating_systems WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::RatingSystemNotFound(id))
    }

    /// Rating settings of a list, if any
    pub async fn get_list_rating_settings(&self, list_id: &str) -> Result<Option<ListRatingSettings>> {
        let settings = sqlx::query_as::<_, ListRatingSettings>(
            "SELECT * FROM list_rating_settings WHERE list_id = ?",
        )
        .bind(list_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Rating system bound to a list, if any
    pub async fn get_list_rating_system(&self, list_id: &str) -> Result<Option<RatingSystem>> {
        let system = sqlx::query_as::<_, RatingSystem>(
            r#"
            SELECT rs.* FROM rating_systems rs
            JOIN list_rating_settings lrs ON lrs.rating_system_id = rs.id
            WHERE lrs.list_id = ?
            "#,
        )
        .bind(list_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(system)
    }

    /// Bind a list to a rating system, replacing any existing binding
    pub async fn set_list_rating_system(
        &self,
        list_id: &str,
        rating_system_id: i64,
    ) -> Result<ListRatingSettings> {
        let settings = sqlx::query_as::<_, ListRatingSettings>(
            r#"
            INSERT INTO list_rating_settings (list_id, rating_system_id, is_required, display_position)
            VALUES (?, ?, 1, 0)
            ON CONFLICT(list_id) DO UPDATE SET rating_system_id = excluded.rating_system_id
            RETURNING *
            "#,
        )
        .bind(list_id)
        .bind(rating_system_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("List {} now uses rating system {}", list_id, rating_system_id);
        Ok(settings)
    }
}
