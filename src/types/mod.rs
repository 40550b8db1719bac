//! Core Value Types
//!
//! Shared types that flow through the pipeline: the unified error type
//! and the [`ChangeSet`](changeset::ChangeSet) work unit.

pub mod changeset;
pub mod error;

pub use changeset::ChangeSet;
pub use error::{DocflowError, ErrorCategory, ErrorClassifier, LlmError, Result};
