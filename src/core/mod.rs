//! Core types shared across the update pipeline.
//!
//! Currently this is the error taxonomy plus the colored error-context
//! display used by the CLI entry point. Domain types live next to the code
//! that owns them ([`crate::release`], [`crate::source`], [`crate::executor`]).

pub mod error;

pub use error::{ErrorContext, UpdraftError, user_friendly_error};
