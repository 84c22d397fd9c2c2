//! Shared utilities.
//!
//! # Modules
//!
//! - [`fs`] - File system operations used by the release and update stages
//! - [`progress`] - Terminal spinners for long-running network operations

pub mod fs;
pub mod progress;

pub use fs::{copy_dir, ensure_dir, remove_dir_all, remove_file};
