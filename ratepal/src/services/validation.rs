//! Entry form validation
//!
//! Produces one human-readable message per invalid input, keyed by field id
//! or by the reserved `title` / `rating` keys. Every rule runs; nothing
//! short-circuits. Validation never touches storage and never fails.

use super::form::EntryDraft;
use crate::config::{
    DEFAULT_RATING_MAX, DEFAULT_RATING_MIN, MULTI_SELECT_DELIMITER, RATING_KEY, TITLE_KEY,
};
use crate::database::RatingSystem;
use crate::fields::value::parse_number;
use crate::fields::{FieldDefinition, FieldInput, FieldType};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Validation messages keyed by field id, `title` or `rating`.
/// Empty means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.entry(key.into()).or_insert_with(|| message.into());
    }
}

/// Inclusive rating bounds: the bound system's range or the default `[1, 5]`
pub fn rating_bounds(rating_system: Option<&RatingSystem>) -> (f64, f64) {
    rating_system
        .map(|rs| (rs.min_value, rs.max_value))
        .unwrap_or((DEFAULT_RATING_MIN, DEFAULT_RATING_MAX))
}

/// Validate a draft against its list's fields and rating system
pub fn validate_entry(
    fields: &[FieldDefinition],
    rating_system: Option<&RatingSystem>,
    draft: &EntryDraft,
) -> FormErrors {
    let mut errors = FormErrors::default();

    if draft.title.trim().is_empty() {
        errors.insert(TITLE_KEY, "Title is required");
    }

    if let Some(message) = check_rating(&draft.rating, rating_system) {
        errors.insert(RATING_KEY, message);
    }

    for field in fields {
        if let Some(message) = check_field(field, draft.value(&field.id)) {
            errors.insert(field.id.clone(), message);
        }
    }

    let known: HashSet<&str> = fields.iter().map(|f| f.id.as_str()).collect();
    for entry in &draft.values {
        if !known.contains(entry.field_id.as_str()) {
            errors.insert(entry.field_id.clone(), "Unknown field");
        }
    }

    errors
}

fn check_rating(raw: &str, rating_system: Option<&RatingSystem>) -> Option<String> {
    if raw.trim().is_empty() {
        return Some("Rating is required".to_string());
    }

    let Some(rating) = parse_number(raw) else {
        return Some("Rating must be a number".to_string());
    };

    let (min, max) = rating_bounds(rating_system);
    if rating < min || rating > max {
        return Some(format!("Rating must be between {} and {}", min, max));
    }

    None
}

fn check_field(field: &FieldDefinition, value: Option<&FieldInput>) -> Option<String> {
    let empty = FieldInput::empty(field.field_type);
    let value = value.unwrap_or(&empty);

    if value.field_type() != field.field_type {
        return Some(format!(
            "{} expects a {} value",
            field.name,
            field.field_type.label()
        ));
    }

    if field.required && value.is_empty() {
        return Some(format!("{} is required", field.name));
    }

    match value {
        FieldInput::Number(raw) if !value.is_empty() && parse_number(raw).is_none() => {
            Some(format!("{} must be a number", field.name))
        }
        FieldInput::MultiSelect(items)
            if field.field_type == FieldType::MultiSelect
                && items.iter().any(|i| i.contains(MULTI_SELECT_DELIMITER)) =>
        {
            Some(format!(
                "{} selections cannot contain '{}'",
                field.name, MULTI_SELECT_DELIMITER
            ))
        }
        _ => None,
    }
}
