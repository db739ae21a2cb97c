//! Command implementations

pub mod analyze;
pub mod base;
pub mod init;
pub mod ls;
pub mod validators;

pub use analyze::{AnalyzeCommand, BatchSummary};
pub use base::{Command, CommandContext};
pub use init::InitCommand;
pub use ls::ListCommand;
