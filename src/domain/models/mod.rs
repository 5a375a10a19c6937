pub mod category;
pub mod file;
