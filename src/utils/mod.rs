//! Utility modules for common functionality

pub mod filesystem;
pub mod filters;
pub mod sanitizers;

// Re-export commonly used functions
pub use filesystem::{ensure_directory_exists, write_json};
pub use filters::filter_by_groups;
pub use sanitizers::{record_file_name, sanitize_for_filename};
