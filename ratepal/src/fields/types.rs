//! Field type registry
//!
//! The closed set of custom field types. Each type knows its persisted id,
//! its stable name, the label shown to users and the input widget used to
//! edit it. Serialization of values lives in [`super::value`].

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of a user-defined custom field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Boolean,
    Select,
    MultiSelect,
}

/// Input widget a caller renders for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputWidget {
    TextInput,
    NumericInput,
    DatePicker,
    Toggle,
    Dropdown,
    Checklist,
}

impl FieldType {
    pub const ALL: [FieldType; 6] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Date,
        FieldType::Boolean,
        FieldType::Select,
        FieldType::MultiSelect,
    ];

    /// Id stored in `custom_fields.field_type_id`
    pub fn id(self) -> i64 {
        match self {
            FieldType::Text => 1,
            FieldType::Number => 2,
            FieldType::Date => 3,
            FieldType::Boolean => 4,
            FieldType::Select => 5,
            FieldType::MultiSelect => 6,
        }
    }

    /// Resolve a persisted type id.
    pub fn from_id(id: i64) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.id() == id)
            .ok_or_else(|| AppError::UnknownFieldType(id.to_string()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multi_select",
        }
    }

    /// Human label for pickers and headings
    pub fn label(self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Number => "Number",
            FieldType::Date => "Date",
            FieldType::Boolean => "Yes/No",
            FieldType::Select => "Select",
            FieldType::MultiSelect => "Multi-Select",
        }
    }

    pub fn widget(self) -> InputWidget {
        match self {
            FieldType::Text => InputWidget::TextInput,
            FieldType::Number => InputWidget::NumericInput,
            FieldType::Date => InputWidget::DatePicker,
            FieldType::Boolean => InputWidget::Toggle,
            FieldType::Select => InputWidget::Dropdown,
            FieldType::MultiSelect => InputWidget::Checklist,
        }
    }

    /// Whether the type carries a list of options
    pub fn has_options(self) -> bool {
        matches!(self, FieldType::Select | FieldType::MultiSelect)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "text" => Ok(FieldType::Text),
            "number" => Ok(FieldType::Number),
            "date" => Ok(FieldType::Date),
            "boolean" | "yes/no" => Ok(FieldType::Boolean),
            "select" => Ok(FieldType::Select),
            "multi_select" | "multiselect" => Ok(FieldType::MultiSelect),
            _ => Err(AppError::UnknownFieldType(s.to_string())),
        }
    }
}
