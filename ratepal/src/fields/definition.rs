//! Custom field definitions
//!
//! [`FieldDefinition`] is the decoded, typed view of a `custom_fields` row.
//! [`FieldSpec`] is what a caller submits when creating or editing one.

use super::options;
use super::types::FieldType;
use crate::config::MULTI_SELECT_DELIMITER;
use crate::database::CustomField;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// A typed custom field of a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: String,
    pub list_id: String,
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    /// Empty for types without options
    pub options: Vec<String>,
    pub position: i64,
}

impl FieldDefinition {
    /// Decode a stored row. Unknown type ids are an error, not skipped.
    pub fn from_row(row: &CustomField) -> Result<Self> {
        let field_type = FieldType::from_id(row.field_type_id)?;
        let options = if field_type.has_options() {
            options::decode_opt(row.options.as_deref())
        } else {
            Vec::new()
        };

        Ok(Self {
            id: row.id.clone(),
            list_id: row.list_id.clone(),
            name: row.name.clone(),
            field_type,
            required: row.is_required,
            options,
            position: row.position,
        })
    }

    /// Decode rows in display order
    pub fn from_rows(rows: &[CustomField]) -> Result<Vec<Self>> {
        let mut fields = rows.iter().map(Self::from_row).collect::<Result<Vec<_>>>()?;
        fields.sort_by_key(|f| f.position);
        Ok(fields)
    }
}

/// Name, type, required flag and options submitted for a field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<S: AsRef<str>>(mut self, options: &[S]) -> Self {
        self.options = options::normalize(options);
        self
    }

    /// Check the submitted definition and return the trimmed name plus the options column
    /// value to persist (canonical JSON, `None` for types without options).
    pub fn validate(&self) -> Result<(String, Option<String>)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidField("Field name is required".to_string()));
        }

        if !self.field_type.has_options() {
            return Ok((name.to_string(), None));
        }

        let opts = options::normalize(&self.options);
        if opts.is_empty() {
            return Err(AppError::InvalidField(
                "Options are required for select fields".to_string(),
            ));
        }

        if self.field_type == FieldType::MultiSelect {
            if let Some(bad) = opts.iter().find(|o| o.contains(MULTI_SELECT_DELIMITER)) {
                return Err(AppError::InvalidField(format!(
                    "Option '{}' cannot contain '{}'",
                    bad, MULTI_SELECT_DELIMITER
                )));
            }
        }

        Ok((name.to_string(), Some(options::encode(&opts)?)))
    }
}
