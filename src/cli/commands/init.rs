//! `docflow init` - scaffold project configuration

use console::style;

use crate::config::ConfigLoader;
use crate::types::Result;

pub fn run(name: Option<&str>, force: bool) -> Result<()> {
    if ConfigLoader::is_project_initialized() && !force {
        println!(
            "{} project already initialized ({})",
            style("ℹ").blue(),
            ConfigLoader::project_config_path().display()
        );
        println!("  Use --force to overwrite the existing configuration");
        return Ok(());
    }

    let project_dir = ConfigLoader::init_project(name, force)?;

    println!(
        "{} initialized docflow in {}",
        style("✓").green(),
        project_dir.display()
    );
    println!("  Edit {} to declare your modules", ConfigLoader::project_config_path().display());
    Ok(())
}
