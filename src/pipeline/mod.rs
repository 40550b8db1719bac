//! Pipeline Orchestration
//!
//! Runs one batch end to end: deterministic regeneration, optional AI
//! enhancement, then publishing. The ordering guarantee is strict within a
//! batch: regeneration completes (or fails and aborts) before enhancement
//! begins, so enhancement always reads post-regeneration content, and the
//! publisher only runs when generation did not fail.
//!
//! Failure policy mirrors the error taxonomy: the deterministic core is
//! fail-closed (any generation error aborts the batch), enhancement is
//! fail-open (missing credentials or call failures degrade to
//! "no enhancement", never blocking the deterministic docs).

use async_trait::async_trait;

use tracing::{info, warn};

use crate::aggregator::BatchHandler;
use crate::ai::create_provider;
use crate::config::Config;
use crate::enhancer::{AiEnhancer, EnhanceReport};
use crate::generator::{DocGenerator, GenerationReport};
use crate::publisher::{PublishOutcome, Publisher};
use crate::types::{ChangeSet, Result};

/// Outcome of one pipeline run
#[derive(Debug)]
pub struct PipelineReport {
    pub generation: GenerationReport,
    /// None when enhancement was not requested or was unavailable
    pub enhancement: Option<EnhanceReport>,
    /// None when publishing is disabled
    pub publish: Option<PublishOutcome>,
}

/// Batch orchestrator wiring generator, enhancer, and publisher together
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run one batch. `enhance` carries the aggregator's threshold decision
    /// (or an explicit CLI choice).
    pub async fn run(&self, change: &ChangeSet, enhance: bool) -> Result<PipelineReport> {
        info!(change = %change.summary(), enhance, "pipeline batch starting");

        // Deterministic regeneration: fail-closed
        let generation = DocGenerator::from_config(&self.config).generate()?;

        // Enhancement: fail-open
        let enhancement = if enhance {
            self.try_enhance(change).await
        } else {
            None
        };

        // Publishing only after generation succeeded
        let publish = if self.config.publish.enabled {
            Some(Publisher::from_config(&self.config.publish).publish(change)?)
        } else {
            None
        };

        Ok(PipelineReport {
            generation,
            enhancement,
            publish,
        })
    }

    /// Attempt enhancement; degrades to None on missing credentials or an
    /// aborted enhancement run.
    async fn try_enhance(&self, change: &ChangeSet) -> Option<EnhanceReport> {
        let provider = match create_provider(&self.config.llm) {
            Ok(provider) => provider,
            Err(e) => {
                warn!(error = %e, "enhancement unavailable, continuing without it");
                return None;
            }
        };

        match AiEnhancer::from_config(provider, &self.config)
            .enhance(change)
            .await
        {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(error = %e, "enhancement run aborted, deterministic docs unaffected");
                None
            }
        }
    }
}

#[async_trait]
impl BatchHandler for Pipeline {
    async fn process(&self, batch: ChangeSet, enhance: bool) -> Result<()> {
        self.run(&batch, enhance).await.map(|_| ())
    }
}

// =============================================================================
// Tests
// =============================================================================
