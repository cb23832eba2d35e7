pub mod backdrop;
pub mod config;
pub mod field;
pub mod types;
