//! RatePal library
//!
//! Lists of rated entries with per-list custom fields: typed field values,
//! form validation and the entry save flow, backed by SQLite.

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod fields;
pub mod services;
pub mod settings;
