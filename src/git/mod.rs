//! Git operations using system git commands for maximum compatibility
//!
//! ## Sub-modules
//!
//! - [`clone`]: Acquiring a working copy of a remote repository
//!   - `clone_repository()` - Full clone of the default branch
//!   - `authenticated_url()` - Clone URL carrying a hosting token
//!
//! - [`history`]: Read-only queries against a working copy's log
//!   - `commit_count()`, `commit_dates()`, `author_emails()`
//!   - `commit_changes()` - subject line plus touched paths per commit
//!   - `commit_sizes()` - changed lines per commit
//!
//! - [`common`]: Shared utilities and helpers
//!   - `Logger` - Consistent logging keyed by repository

pub mod clone;
pub mod common;
pub mod history;

pub use clone::{authenticated_url, clone_repository};
pub use common::Logger;
pub use history::{
    CommitChange, author_emails, commit_changes, commit_count, commit_dates, commit_sizes,
};
