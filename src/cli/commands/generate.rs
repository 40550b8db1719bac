//! `docflow generate` - deterministic regeneration only

use console::style;

use crate::config::ConfigLoader;
use crate::generator::DocGenerator;
use crate::types::Result;

pub fn run() -> Result<()> {
    let config = ConfigLoader::load()?;
    let generator = DocGenerator::from_config(&config);

    let report = generator.generate()?;

    println!(
        "{} regenerated {} pages ({} modules, {} entities)",
        style("✓").green(),
        report.page_count(),
        config.modules.len(),
        config.total_entities()
    );
    if report.types_sync_skipped {
        println!(
            "{} type declarations file absent, sync skipped",
            style("⚠").yellow()
        );
    }
    Ok(())
}
