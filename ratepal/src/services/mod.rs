//! Services module
//!
//! Business logic services that coordinate between callers and the repository.

pub mod entries;
pub mod entry_save;
pub mod fields;
pub mod form;
pub mod lists;
pub mod ratings;
pub mod validation;

pub use entries::{EntriesService, EntryWithValues, Submission};
pub use entry_save::{save_entry, SaveOutcome};
pub use fields::FieldsService;
pub use form::{EntryDraft, FieldEntry};
pub use lists::{ListTemplate, ListsService};
pub use ratings::{RatingDisplay, RatingsService};
pub use validation::{rating_bounds, validate_entry, FormErrors};
