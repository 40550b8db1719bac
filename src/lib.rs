//! DocFlow - Change-Driven Documentation Pipeline
//!
//! A documentation automation system that regenerates a static documentation
//! site from a source application's module layout, optionally enhances the
//! generated Markdown through an LLM provider, and commits the result.
//!
//! ## Core Features
//!
//! - **Change Detection**: Classifies file paths into structured change-sets
//! - **Deterministic Generation**: Idempotent docs tree + navigation manifest
//! - **AI Enhancement**: Optional per-page enrichment with graceful degradation
//! - **Debounced Aggregation**: Burst coalescing with a bounded-staleness flush
//! - **Diff-Aware Publishing**: Commits only when the working tree is dirty
//!
//! ## Quick Start
//!
//! ```ignore
//! use docflow::{ChangeDetector, Pipeline};
//!
//! let config = docflow::ConfigLoader::load()?;
//! let detector = ChangeDetector::from_config(&config.source);
//! let change = detector.classify(&paths);
//! Pipeline::new(config).run(&change, true).await?;
//! ```
//!
//! ## Modules
//!
//! - [`detect`]: Path classification into change-sets
//! - [`generator`]: Deterministic documentation materialization
//! - [`enhancer`]: LLM-driven page enrichment
//! - [`aggregator`]: Debounced batch scheduling
//! - [`publisher`]: Git commit/push of produced artifacts
//! - [`ai`]: LLM provider abstraction

pub mod aggregator;
pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod detect;
pub mod enhancer;
pub mod generator;
pub mod pipeline;
pub mod publisher;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, ModuleDescriptor, SourceConfig, WatchConfig};

// Error Types
pub use types::error::{DocflowError, ErrorCategory, Result};

// Change-set model
pub use types::changeset::ChangeSet;

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use aggregator::{AggregatorConfig, BatchHandler, ChangeAggregator, WatchEvent};
pub use detect::ChangeDetector;
pub use enhancer::{AiEnhancer, EnhanceReport};
pub use generator::{DocGenerator, GenerationReport};
pub use pipeline::{Pipeline, PipelineReport};
pub use publisher::{PublishOutcome, Publisher};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{AnthropicProvider, LlmProvider, OpenAiProvider, ProviderConfig, SharedProvider};
