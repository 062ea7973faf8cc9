pub mod movies;
pub mod validate;

pub use movies::{MovieService, SCHEMA_MISMATCH_HINTS, looks_like_missing_column};
pub use validate::validate_create;
