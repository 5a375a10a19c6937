pub mod collision;
pub mod sanitizer;

pub use collision::{resolve_collision, split_extension};
pub use sanitizer::{basename, sanitize, sanitize_at};
