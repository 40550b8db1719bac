//! `docflow run` - one-shot pipeline run (the CI entry point)
//!
//! Consumes an explicit list of changed paths (typically a version-control
//! diff), plus optional direct module names and a types-changed flag for
//! workflows that precompute them. The enhancement decision follows the
//! configured threshold unless forced either way.

use std::path::PathBuf;

use console::style;

use crate::config::ConfigLoader;
use crate::detect::ChangeDetector;
use crate::pipeline::Pipeline;
use crate::publisher::PublishOutcome;
use crate::types::{ChangeSet, Result};

pub struct RunOptions {
    /// Changed paths to classify
    pub paths: Vec<PathBuf>,
    /// Modules known to have changed (merged into the classified set)
    pub modules: Vec<String>,
    /// The shared type-declarations file changed
    pub types_changed: bool,
    /// Force enhancement on or off, overriding the threshold
    pub enhance: Option<bool>,
    /// Skip the publish step for this run
    pub no_publish: bool,
}

pub async fn run(options: RunOptions) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if options.no_publish {
        config.publish.enabled = false;
    }

    let detector = ChangeDetector::from_config(&config.source);
    let mut change = detector.classify(&options.paths);
    let mut direct = ChangeSet::from_modules(options.modules);
    direct.types_changed = options.types_changed;
    change.merge(direct);

    let enhance = options
        .enhance
        .unwrap_or(change.distinct_paths() >= config.watch.enhance_threshold);

    let pipeline = Pipeline::new(config);
    let report = pipeline.run(&change, enhance).await?;

    println!(
        "{} {} pages regenerated",
        style("✓").green(),
        report.generation.page_count()
    );
    if let Some(enhancement) = &report.enhancement {
        println!(
            "{} enhancement: {} enhanced, {} skipped, {} failed",
            style("✓").green(),
            enhancement.enhanced.len(),
            enhancement.skipped.len(),
            enhancement.failed.len()
        );
    }
    match &report.publish {
        Some(PublishOutcome::Committed { hash }) => {
            println!("{} committed documentation changes ({})", style("✓").green(), hash);
        }
        Some(PublishOutcome::CleanTree) => {
            println!("{} working tree clean, nothing to commit", style("ℹ").blue());
        }
        Some(PublishOutcome::NotARepo) => {
            println!("{} not a git repository, commit skipped", style("⚠").yellow());
        }
        None => {}
    }
    Ok(())
}
