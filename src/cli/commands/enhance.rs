//! `docflow enhance` - enhancement only, against already-generated pages
//!
//! Unlike the pipeline's fail-open policy, an explicit enhance invocation
//! surfaces configuration errors (missing credential, failed probe) as
//! fatal: the user asked for enhancement specifically.

use console::style;

use crate::ai::create_provider;
use crate::config::ConfigLoader;
use crate::enhancer::AiEnhancer;
use crate::types::{ChangeSet, Result};

pub async fn run(modules: Vec<String>, all: bool) -> Result<()> {
    let config = ConfigLoader::load()?;

    let change = if all {
        ChangeSet::from_modules(config.modules.iter().map(|m| m.name.clone()))
    } else {
        ChangeSet::from_modules(modules)
    };

    if change.modules.is_empty() {
        println!(
            "{} no modules selected (pass module names or --all)",
            style("ℹ").blue()
        );
        return Ok(());
    }

    let provider = create_provider(&config.llm)?;
    println!(
        "Enhancing {} modules with {} ({})",
        change.modules.len(),
        provider.name(),
        provider.model()
    );

    let report = AiEnhancer::from_config(provider, &config)
        .enhance(&change)
        .await?;

    println!(
        "{} enhanced: {}, skipped: {}, failed: {}",
        style("✓").green(),
        report.enhanced.len(),
        report.skipped.len(),
        report.failed.len()
    );
    Ok(())
}
