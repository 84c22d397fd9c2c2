//! Integration test suite for updraft
//!
//! This test suite contains end-to-end tests that run the compiled CLI
//! against mock release servers and real temporary file trees, plus
//! library-level tests for the source backends that have no configuration
//! knob for pointing at a mock server.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! Tests are organized by functionality area:
//! - **check**: Update checks, the availability marker, and remote call caching
//! - **clean**: Staging directory cleanup
//! - **cli**: Help output, version reporting, and argument validation
//! - **errors**: Error reporting and exit codes
//! - **fetch**: Release staging (download, extraction, archive handling)
//! - **github_sources**: GitHub tag and branch backends against a mock API
//! - **http_source**: HTTP directory-listing backend
//! - **status**: Version status display
//! - **update**: Applying staged releases over an installation tree

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

// Integration tests
mod check;
mod clean;
mod cli;
mod errors;
mod github_sources;
mod update;
