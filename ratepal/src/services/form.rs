//! Editable entry form state
//!
//! An [`EntryDraft`] is what create and edit screens bind to: the entry's
//! scalar inputs plus one typed [`FieldEntry`] per custom field, in the
//! list's field order.

use crate::database::{Entry, FieldValue};
use crate::fields::{FieldDefinition, FieldInput};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Form value of one custom field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub field_id: String,
    pub value: FieldInput,
}

/// Form state of an entry being created or edited
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    /// Set when editing an existing entry
    pub entry_id: Option<String>,
    pub title: String,
    pub description: String,
    /// Raw rating text as typed
    pub rating: String,
    pub values: Vec<FieldEntry>,
}

impl EntryDraft {
    /// Blank form for a new entry of a list
    pub fn blank(fields: &[FieldDefinition]) -> Self {
        Self {
            values: fields
                .iter()
                .map(|f| FieldEntry {
                    field_id: f.id.clone(),
                    value: FieldInput::empty(f.field_type),
                })
                .collect(),
            ..Self::default()
        }
    }

    /// Form for editing a stored entry, merging the list schema with the
    /// entry's stored values. Fields without a stored value start empty.
    pub fn from_entry(fields: &[FieldDefinition], entry: &Entry, values: &[FieldValue]) -> Self {
        let by_field: HashMap<&str, &FieldValue> =
            values.iter().map(|v| (v.field_id.as_str(), v)).collect();

        Self {
            entry_id: Some(entry.id.clone()),
            title: entry.title.clone(),
            description: entry.description.clone().unwrap_or_default(),
            rating: entry.rating.map(|r| r.to_string()).unwrap_or_default(),
            values: fields
                .iter()
                .map(|f| FieldEntry {
                    field_id: f.id.clone(),
                    value: match by_field.get(f.id.as_str()) {
                        Some(stored) => FieldInput::deserialize(f.field_type, &stored.slots()),
                        None => FieldInput::empty(f.field_type),
                    },
                })
                .collect(),
        }
    }

    pub fn value(&self, field_id: &str) -> Option<&FieldInput> {
        self.values
            .iter()
            .find(|v| v.field_id == field_id)
            .map(|v| &v.value)
    }

    /// Set a field's value, replacing any previous one
    pub fn set(&mut self, field_id: impl Into<String>, value: FieldInput) {
        let field_id = field_id.into();
        match self.values.iter_mut().find(|v| v.field_id == field_id) {
            Some(existing) => existing.value = value,
            None => self.values.push(FieldEntry { field_id, value }),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = rating.into();
        self
    }

    pub fn with_value(mut self, field_id: impl Into<String>, value: FieldInput) -> Self {
        self.set(field_id, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldType;
    use chrono::Utc;

    fn field(id: &str, field_type: FieldType) -> FieldDefinition {
        FieldDefinition {
            id: id.to_string(),
            list_id: "list".to_string(),
            name: id.to_string(),
            field_type,
            required: false,
            options: Vec::new(),
            position: 1,
        }
    }

    #[test]
    fn test_blank_has_one_empty_value_per_field() {
        let fields = vec![field("a", FieldType::Boolean), field("b", FieldType::MultiSelect)];
        let draft = EntryDraft::blank(&fields);

        assert!(draft.entry_id.is_none());
        assert_eq!(draft.value("a"), Some(&FieldInput::Boolean(None)));
        assert_eq!(draft.value("b"), Some(&FieldInput::MultiSelect(vec![])));
    }

    #[test]
    fn test_from_entry_merges_stored_values() {
        let fields = vec![field("price", FieldType::Number), field("notes", FieldType::Text)];
        let now = Utc::now();
        let entry = Entry {
            id: "e1".to_string(),
            list_id: "list".to_string(),
            user_id: None,
            title: "Luigi's".to_string(),
            description: None,
            rating: Some(4.5),
            created_at: now,
            updated_at: now,
        };
        let values = vec![FieldValue {
            id: "v1".to_string(),
            entry_id: "e1".to_string(),
            field_id: "price".to_string(),
            value_text: None,
            value_number: Some(25.0),
            value_date: None,
            value_boolean: None,
        }];

        let draft = EntryDraft::from_entry(&fields, &entry, &values);

        assert_eq!(draft.entry_id.as_deref(), Some("e1"));
        assert_eq!(draft.rating, "4.5");
        assert_eq!(draft.description, "");
        assert_eq!(draft.value("price"), Some(&FieldInput::Number("25".to_string())));
        assert_eq!(draft.value("notes"), Some(&FieldInput::Text(String::new())));
    }

    #[test]
    fn test_set_replaces_existing_value() {
        let fields = vec![field("notes", FieldType::Text)];
        let mut draft = EntryDraft::blank(&fields);

        draft.set("notes", FieldInput::Text("great".to_string()));

        assert_eq!(draft.values.len(), 1);
        assert_eq!(draft.value("notes"), Some(&FieldInput::Text("great".to_string())));
    }
}
