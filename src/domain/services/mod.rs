// Pure rules of the intake job. No I/O here; the pipeline feeds these from storage.

pub mod classifier;
pub mod intake;

pub use classifier::{classify, clean_description, normalize_phone};
pub use intake::{file_extension, validate_count, validate_extension};
