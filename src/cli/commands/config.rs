//! `docflow config` - inspect and initialize configuration

use console::style;

use crate::config::ConfigLoader;
use crate::types::Result;

/// Show the effective merged configuration
pub fn show(as_json: bool) -> Result<()> {
    ConfigLoader::show_config(as_json)
}

/// Show configuration file paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Create the global configuration file
pub fn init_global(force: bool) -> Result<()> {
    let dir = ConfigLoader::init_global(force)?;
    println!(
        "{} global configuration ready in {}",
        style("✓").green(),
        dir.display()
    );
    Ok(())
}
