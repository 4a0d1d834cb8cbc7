//! Custom field model
//!
//! This module provides the dynamic schema-and-value layer:
//! - Field type registry (labels, widgets, ids)
//! - Typed form values and their persisted slot layout
//! - Options codec for choice fields
//! - Field definitions decoded from stored rows

pub mod definition;
pub mod options;
pub mod types;
pub mod value;

pub use definition::{FieldDefinition, FieldSpec};
pub use types::{FieldType, InputWidget};
pub use value::{FieldInput, ValueSlots};
