//! Application configuration constants
//!
//! Central location for constants, resource limits and validation
//! boundaries used throughout the crate.

// ===== Ratings =====

/// Lower bound of the rating range when a list has no rating system bound
pub const DEFAULT_RATING_MIN: f64 = 1.0;
/// Upper bound of the rating range when a list has no rating system bound
pub const DEFAULT_RATING_MAX: f64 = 5.0;

/// Rating system bound to new lists unless another is requested ("Five Stars")
pub const DEFAULT_RATING_SYSTEM_ID: i64 = 1;

// ===== Form State =====

/// Reserved form-error key for the entry title
pub const TITLE_KEY: &str = "title";
/// Reserved form-error key for the entry rating
pub const RATING_KEY: &str = "rating";

/// Delimiter joining multi-select labels inside `value_text`.
/// Labels containing it cannot be told apart from several labels.
pub const MULTI_SELECT_DELIMITER: char = ',';

// ===== Storage =====

/// File name of the SQLite database inside the data directory
pub const DATABASE_FILE_NAME: &str = "ratepal.db";

/// File name of the JSON settings file inside the data directory
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Environment variable naming the data directory for the binary
pub const DATA_DIR_ENV: &str = "RATEPAL_DATA_DIR";

/// Maximum pooled SQLite connections for the application pool
pub const POOL_MAX_CONNECTIONS: u32 = 5;

/// How long a connection waits on a locked database before failing
pub const BUSY_TIMEOUT_SECS: u64 = 5;

// ===== Logging =====

/// Filter used when neither RUST_LOG nor the settings file provide one
pub const DEFAULT_LOG_FILTER: &str = "ratepal=debug,info";
