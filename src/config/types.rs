//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/docflow/) and project (.docflow/) level
//! configuration. The module catalogue lives here too: modules and their
//! entities are static configuration, never derived at runtime.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::ai::ProviderConfig;
use crate::constants;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Project-specific settings
    pub project: ProjectConfig,

    /// Source tree layout consumed by the change detector and enhancer
    pub source: SourceConfig,

    /// Documentation output settings
    pub docs: DocsConfig,

    /// LLM provider settings
    pub llm: ProviderConfig,

    /// Change aggregation settings
    pub watch: WatchConfig,

    /// Version-control publishing settings
    pub publish: PublishConfig,

    /// Module catalogue: one descriptor per documented module
    pub modules: Vec<ModuleDescriptor>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            project: ProjectConfig::default(),
            source: SourceConfig::default(),
            docs: DocsConfig::default(),
            llm: ProviderConfig::default(),
            watch: WatchConfig::default(),
            publish: PublishConfig::default(),
            modules: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values and catalogue uniqueness constraints.
    /// Returns `DocflowError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        use crate::types::DocflowError;

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(DocflowError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(DocflowError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.watch.debounce_secs == 0 {
            return Err(DocflowError::Config(
                "watch.debounce_secs must be greater than 0".to_string(),
            ));
        }

        if self.watch.enhance_threshold == 0 {
            return Err(DocflowError::Config(
                "watch.enhance_threshold must be at least 1".to_string(),
            ));
        }

        // Module names unique across the catalogue
        let mut seen = BTreeSet::new();
        for module in &self.modules {
            if !seen.insert(module.name.as_str()) {
                return Err(DocflowError::Config(format!(
                    "Duplicate module name in catalogue: '{}'",
                    module.name
                )));
            }
            module.validate()?;
        }

        Ok(())
    }

    /// Look up a module descriptor by name
    pub fn module(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Total entity count across all modules (derived, never hand-maintained)
    pub fn total_entities(&self) -> usize {
        self.modules.iter().map(|m| m.entities.len()).sum()
    }
}

// =============================================================================
// Project Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project name (defaults to directory name)
    pub name: Option<String>,

    /// Site title used on generated overview pages
    pub site_name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: None,
            site_name: "Documentation".to_string(),
        }
    }
}

// =============================================================================
// Source Tree Layout
// =============================================================================

/// Where the documented application keeps its modules, shared layers, and
/// the generated type-declarations file. Segment names are matched against
/// path components during change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Root of the source tree (watched recursively)
    pub root: PathBuf,

    /// Directory segment under which one directory per module lives
    pub modules_dir: String,

    /// Shared UI components root segment
    pub components_dir: String,

    /// Shared services root segment
    pub services_dir: String,

    /// Directory inside each module holding entity definition files
    pub entities_dir: String,

    /// The shared generated type-declarations file (matched as a path suffix)
    pub types_file: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("src"),
            modules_dir: "modules".to_string(),
            components_dir: "components".to_string(),
            services_dir: "services".to_string(),
            entities_dir: "entities".to_string(),
            types_file: PathBuf::from("generated.d.ts"),
        }
    }
}

impl SourceConfig {
    /// Directory holding a module's source, e.g. `src/modules/sales`
    pub fn module_dir(&self, module: &str) -> PathBuf {
        self.root.join(&self.modules_dir).join(module)
    }

    /// Directory holding a module's entity definitions
    pub fn module_entities_dir(&self, module: &str) -> PathBuf {
        self.module_dir(module).join(&self.entities_dir)
    }
}

// =============================================================================
// Documentation Output
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Root of the generated documentation tree
    pub output_dir: PathBuf,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("docs"),
        }
    }
}

// =============================================================================
// Change Aggregation
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Quiet period after the last file event before a batch runs (seconds)
    pub debounce_secs: u64,

    /// Periodic flush bounding staleness under continuous churn (seconds)
    pub flush_interval_secs: u64,

    /// Distinct changed paths at or above which enhancement also runs
    pub enhance_threshold: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_secs: constants::watch::DEBOUNCE_SECS,
            flush_interval_secs: constants::watch::FLUSH_INTERVAL_SECS,
            enhance_threshold: constants::watch::ENHANCE_THRESHOLD,
        }
    }
}

// =============================================================================
// Publishing
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Commit produced changes at the end of a batch
    pub enabled: bool,

    /// Push after committing (off by default; CI opts in explicitly)
    pub push: bool,

    /// Remote used when pushing
    pub remote: String,

    /// Branch used when pushing (current branch when unset)
    pub branch: Option<String>,

    /// Repository to commit in (current directory when unset)
    pub repo_dir: Option<PathBuf>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            push: false,
            remote: "origin".to_string(),
            branch: None,
            repo_dir: None,
        }
    }
}

// =============================================================================
// Module Catalogue
// =============================================================================

/// Static description of one documented module.
///
/// Entity order is meaningful: it determines page listing order in the
/// generated module page and the navigation manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Unique module identifier
    pub name: String,

    /// Ordered entity identifiers, unique within the module
    pub entities: Vec<String>,

    /// Generate the services documentation section
    #[serde(default)]
    pub has_services: bool,

    /// Generate the testing documentation section
    #[serde(default)]
    pub has_tests: bool,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>, entities: Vec<String>) -> Self {
        Self {
            name: name.into(),
            entities,
            has_services: false,
            has_tests: false,
        }
    }

    /// Check entity identifiers are unique within this module
    pub fn validate(&self) -> crate::types::Result<()> {
        let mut seen = BTreeSet::new();
        for entity in &self.entities {
            if !seen.insert(entity.as_str()) {
                return Err(crate::types::DocflowError::Config(format!(
                    "Duplicate entity '{}' in module '{}'",
                    entity, self.name
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
