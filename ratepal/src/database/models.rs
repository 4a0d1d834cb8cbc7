//! Database models
//!
//! Rust structs representing database rows plus the request structs used
//! to create and update them.

use crate::fields::ValueSlots;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Identifier of the signed-in user performing a write.
///
/// Writes made without one are stored as guest rows (`user_id` NULL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user-defined list of rated entries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct List {
    pub id: String,
    pub user_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create list request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateListRequest {
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    /// Falls back to the default rating system when absent
    pub rating_system_id: Option<i64>,
}

/// Update list request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateListRequest {
    pub id: String,
    pub title: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    pub is_public: Option<bool>,
}

/// Aggregate figures shown on a list overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSummary {
    pub list_id: String,
    pub entry_count: i64,
    pub average_rating: Option<f64>,
    pub last_entry_at: Option<DateTime<Utc>>,
}

/// Custom field row; `field_type_id` and `options` are decoded by
/// [`crate::fields::FieldDefinition`]
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomField {
    pub id: String,
    pub list_id: String,
    pub field_type_id: i64,
    pub name: String,
    /// Canonically a JSON array; older rows hold legacy encodings
    pub options: Option<String>,
    pub is_required: bool,
    pub position: i64,
}

/// A rated item in a list
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: String,
    pub list_id: String,
    pub user_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create entry request
#[derive(Debug, Clone)]
pub struct CreateEntryRequest {
    pub list_id: String,
    pub user_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub rating: Option<f64>,
}

/// Scalar attributes overwritten on every entry save
#[derive(Debug, Clone)]
pub struct UpdateEntryRequest {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub rating: Option<f64>,
}

/// Value of one custom field for one entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FieldValue {
    pub id: String,
    pub entry_id: String,
    pub field_id: String,
    pub value_text: Option<String>,
    pub value_number: Option<f64>,
    pub value_date: Option<String>,
    pub value_boolean: Option<bool>,
}

impl FieldValue {
    pub fn slots(&self) -> ValueSlots {
        ValueSlots {
            text: self.value_text.clone(),
            number: self.value_number,
            date: self.value_date.clone(),
            boolean: self.value_boolean,
        }
    }
}

/// Range, step and presentation of ratings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RatingSystem {
    pub id: i64,
    pub name: String,
    pub min_value: f64,
    pub max_value: f64,
    pub step_value: f64,
    /// One of `stars`, `number`, `emoji`, `slider`
    pub display_type: String,
    /// JSON array of labels, lowest tier first
    pub tier_labels: Option<String>,
}

/// Binding of a list to its rating system
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ListRatingSettings {
    pub list_id: String,
    pub rating_system_id: i64,
    pub is_required: bool,
    pub display_position: i64,
}
