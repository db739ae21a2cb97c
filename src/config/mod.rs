//! Configuration management module

pub mod credentials;
pub mod input;
pub mod loader;
pub mod validation;

pub use credentials::Credentials;
pub use input::{RepositoryEntry, load_entries, parse_entries};
pub use loader::{AcquirerConfig, ComplexityConfig, Config, QualitativeConfig};
