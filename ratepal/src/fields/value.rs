//! Typed field values
//!
//! [`FieldInput`] is the editable form representation of one custom field
//! value. [`ValueSlots`] is its persisted shape: four nullable typed columns
//! of which at most one is populated.

use super::types::FieldType;
use crate::config::MULTI_SELECT_DELIMITER;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Form-state value of a custom field, tagged by field type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldInput {
    Text(String),
    /// Raw numeric text as typed by the user
    Number(String),
    /// Date text, stored verbatim
    Date(String),
    /// `None` means unset; `Some(false)` is a present value
    Boolean(Option<bool>),
    Select(String),
    MultiSelect(Vec<String>),
}

/// Persisted typed columns of a field value row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueSlots {
    pub text: Option<String>,
    pub number: Option<f64>,
    pub date: Option<String>,
    pub boolean: Option<bool>,
}

impl ValueSlots {
    pub fn text(value: String) -> Self {
        Self {
            text: Some(value),
            ..Self::default()
        }
    }

    pub fn number(value: f64) -> Self {
        Self {
            number: Some(value),
            ..Self::default()
        }
    }

    pub fn date(value: String) -> Self {
        Self {
            date: Some(value),
            ..Self::default()
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self {
            boolean: Some(value),
            ..Self::default()
        }
    }

    /// Number of non-null slots
    pub fn populated(&self) -> usize {
        [
            self.text.is_some(),
            self.number.is_some(),
            self.date.is_some(),
            self.boolean.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    pub fn is_cleared(&self) -> bool {
        self.populated() == 0
    }
}

impl FieldInput {
    /// Empty value for a field type
    pub fn empty(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Text => FieldInput::Text(String::new()),
            FieldType::Number => FieldInput::Number(String::new()),
            FieldType::Date => FieldInput::Date(String::new()),
            FieldType::Boolean => FieldInput::Boolean(None),
            FieldType::Select => FieldInput::Select(String::new()),
            FieldType::MultiSelect => FieldInput::MultiSelect(Vec::new()),
        }
    }

    /// Build a value from raw widget text.
    ///
    /// Booleans accept `true`/`false`/`yes`/`no` (anything else is unset);
    /// multi-select text is split on the delimiter.
    pub fn from_raw(field_type: FieldType, raw: &str) -> Self {
        match field_type {
            FieldType::Text => FieldInput::Text(raw.to_string()),
            FieldType::Number => FieldInput::Number(raw.to_string()),
            FieldType::Date => FieldInput::Date(raw.to_string()),
            FieldType::Boolean => FieldInput::Boolean(match raw.trim().to_lowercase().as_str() {
                "true" | "yes" => Some(true),
                "false" | "no" => Some(false),
                _ => None,
            }),
            FieldType::Select => FieldInput::Select(raw.to_string()),
            FieldType::MultiSelect => FieldInput::MultiSelect(split_labels(raw)),
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            FieldInput::Text(_) => FieldType::Text,
            FieldInput::Number(_) => FieldType::Number,
            FieldInput::Date(_) => FieldType::Date,
            FieldInput::Boolean(_) => FieldType::Boolean,
            FieldInput::Select(_) => FieldType::Select,
            FieldInput::MultiSelect(_) => FieldType::MultiSelect,
        }
    }

    /// Type-specific emptiness used by required-field validation.
    ///
    /// Numeric zero and `false` are present values.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldInput::Text(s) | FieldInput::Select(s) => s.trim().is_empty(),
            FieldInput::Number(s) => s.trim().is_empty(),
            FieldInput::Date(s) => s.trim().is_empty(),
            FieldInput::Boolean(b) => b.is_none(),
            FieldInput::MultiSelect(items) => items.iter().all(|i| i.trim().is_empty()),
        }
    }

    /// Convert into the persisted slot layout.
    ///
    /// Empty values clear every slot. Blank multi-select labels are dropped.
    /// Fails for numbers that do not parse and for multi-select labels
    /// containing the delimiter.
    pub fn serialize(&self) -> Result<ValueSlots> {
        if self.is_empty() {
            return Ok(ValueSlots::default());
        }

        match self {
            FieldInput::Text(s) | FieldInput::Select(s) => Ok(ValueSlots::text(s.clone())),
            FieldInput::Number(s) => parse_number(s)
                .map(ValueSlots::number)
                .ok_or_else(|| AppError::InvalidValue(format!("'{}' is not a number", s.trim()))),
            FieldInput::Date(s) => Ok(ValueSlots::date(s.clone())),
            FieldInput::Boolean(b) => Ok(b.map(ValueSlots::boolean).unwrap_or_default()),
            FieldInput::MultiSelect(items) => {
                if let Some(bad) = items.iter().find(|i| i.contains(MULTI_SELECT_DELIMITER)) {
                    return Err(AppError::InvalidValue(format!(
                        "option '{}' contains the '{}' delimiter",
                        bad, MULTI_SELECT_DELIMITER
                    )));
                }
                let joined = items
                    .iter()
                    .map(|i| i.trim())
                    .filter(|i| !i.is_empty())
                    .collect::<Vec<_>>()
                    .join(&MULTI_SELECT_DELIMITER.to_string());
                Ok(ValueSlots::text(joined))
            }
        }
    }

    /// Rebuild the form value for a field type from persisted slots.
    ///
    /// Slots other than the type's own are ignored; a missing slot yields the
    /// empty value.
    pub fn deserialize(field_type: FieldType, slots: &ValueSlots) -> Self {
        match field_type {
            FieldType::Text => FieldInput::Text(slots.text.clone().unwrap_or_default()),
            FieldType::Number => {
                FieldInput::Number(slots.number.map(format_number).unwrap_or_default())
            }
            FieldType::Date => FieldInput::Date(slots.date.clone().unwrap_or_default()),
            FieldType::Boolean => FieldInput::Boolean(slots.boolean),
            FieldType::Select => FieldInput::Select(slots.text.clone().unwrap_or_default()),
            FieldType::MultiSelect => FieldInput::MultiSelect(
                slots.text.as_deref().map(split_labels).unwrap_or_default(),
            ),
        }
    }

    /// Read-only rendering for entry detail views
    pub fn display(&self) -> String {
        match self {
            FieldInput::Text(s) | FieldInput::Number(s) | FieldInput::Date(s) | FieldInput::Select(s) => {
                s.clone()
            }
            FieldInput::Boolean(Some(true)) => "Yes".to_string(),
            FieldInput::Boolean(Some(false)) => "No".to_string(),
            FieldInput::Boolean(None) => String::new(),
            FieldInput::MultiSelect(items) => items.join(", "),
        }
    }
}

/// Parse user-typed numeric text; `None` for blank, non-numeric or non-finite input.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn format_number(n: f64) -> String {
    n.to_string()
}

fn split_labels(raw: &str) -> Vec<String> {
    raw.split(MULTI_SELECT_DELIMITER)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
