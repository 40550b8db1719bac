//! Deterministic Documentation Generation
//!
//! Rewrites the full documentation tree and navigation manifest from the
//! static module catalogue. Generation is idempotent: running twice with
//! unchanged configuration produces a byte-identical tree.
//!
//! Failure policy is fail-closed: any unrecoverable I/O error aborts the
//! run with the failing page named in the error, so a known-incomplete tree
//! is never handed to the publisher. Absent optional input (the shared
//! type-declarations file) is skipped with a warning, not a failure.

mod navigation;
mod pages;

pub use navigation::{NavGroup, NavTab, NavigationManifest};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{Config, ModuleDescriptor};
use crate::constants::docs;
use crate::types::{DocflowError, Result};

/// Outcome of one generation run
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Pages written, relative to the docs root, in write order
    pub written: Vec<PathBuf>,
    /// The type-declarations sync was skipped because the source is absent
    pub types_sync_skipped: bool,
}

impl GenerationReport {
    pub fn page_count(&self) -> usize {
        self.written.len()
    }
}

/// Deterministic documentation generator.
///
/// Owns every page it writes; the enhancer owns the per-module narrative
/// pages after enhancement and the insights section of the architecture
/// overview, and the two never write the same bytes in one batch.
pub struct DocGenerator {
    site_name: String,
    modules: Vec<ModuleDescriptor>,
    output_dir: PathBuf,
    /// Source location of the shared type-declarations file
    types_file: PathBuf,
}

impl DocGenerator {
    pub fn new(
        site_name: impl Into<String>,
        modules: Vec<ModuleDescriptor>,
        output_dir: impl Into<PathBuf>,
        types_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            site_name: site_name.into(),
            modules,
            output_dir: output_dir.into(),
            types_file: types_file.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.project.site_name.clone(),
            config.modules.clone(),
            config.docs.output_dir.clone(),
            config.source.root.join(&config.source.types_file),
        )
    }

    /// Regenerate the full documentation tree and navigation manifest.
    pub fn generate(&self) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();

        self.create_directories()?;

        // Overview pages with derived counts
        self.write_page(
            &mut report,
            "index.md",
            pages::index_page(&self.site_name, &self.modules),
        )?;
        self.write_page(
            &mut report,
            &format!("{}/overview.md", docs::ARCHITECTURE_DIR),
            pages::architecture_overview(&self.site_name, &self.modules),
        )?;
        self.write_page(
            &mut report,
            &format!("{}/overview.md", docs::COMPONENTS_DIR),
            pages::components_overview(&self.modules),
        )?;

        // Per-module and per-entity pages, entity order as declared
        for module in &self.modules {
            self.write_page(
                &mut report,
                &format!("{}/{}.md", docs::MODULES_DIR, module.name),
                pages::module_page(module),
            )?;

            for entity in &module.entities {
                self.write_page(
                    &mut report,
                    &format!("{}/{}/{}.md", docs::API_REFERENCE_DIR, module.name, entity),
                    pages::entity_page(module, entity),
                )?;
            }
        }

        report.types_sync_skipped = !self.sync_types_file(&mut report)?;

        // Navigation manifest last, so it only ever references pages that
        // were just written
        let manifest = NavigationManifest::build(&self.site_name, &self.modules);
        self.write_page(&mut report, docs::NAV_MANIFEST, manifest.to_json()?)?;

        info!(
            pages = report.page_count(),
            modules = self.modules.len(),
            "documentation tree regenerated"
        );
        Ok(report)
    }

    /// Path of a page relative to the docs root
    pub fn page_path(&self, relative: &str) -> PathBuf {
        self.output_dir.join(relative)
    }

    fn create_directories(&self) -> Result<()> {
        for dir in [docs::ARCHITECTURE_DIR, docs::MODULES_DIR, docs::COMPONENTS_DIR] {
            fs::create_dir_all(self.output_dir.join(dir))?;
        }
        for module in &self.modules {
            fs::create_dir_all(
                self.output_dir
                    .join(docs::API_REFERENCE_DIR)
                    .join(&module.name),
            )?;
        }
        Ok(())
    }

    /// Write one page, naming the page in the error on failure
    fn write_page(
        &self,
        report: &mut GenerationReport,
        relative: &str,
        content: String,
    ) -> Result<()> {
        let path = self.output_dir.join(relative);
        fs::write(&path, content).map_err(|e| DocflowError::generation(relative, e))?;
        debug!(page = relative, "wrote page");
        report.written.push(PathBuf::from(relative));
        Ok(())
    }

    /// Copy the shared type-declarations file into the docs tree.
    /// Returns false (with a warning) when the source file is absent;
    /// downstream steps tolerate missing type information.
    fn sync_types_file(&self, report: &mut GenerationReport) -> Result<bool> {
        if !self.types_file.exists() {
            warn!(
                source = %self.types_file.display(),
                "type declarations file absent, skipping sync"
            );
            return Ok(false);
        }

        let target_rel = format!("{}/{}", docs::API_REFERENCE_DIR, docs::SYNCED_TYPES_FILE);
        let target = self.output_dir.join(&target_rel);
        fs::copy(&self.types_file, &target)
            .map_err(|e| DocflowError::generation(&target_rel, e))?;
        debug!(target = %target.display(), "synced type declarations");
        report.written.push(PathBuf::from(target_rel));
        Ok(true)
    }
}

/// Read every generated file under a docs tree into (relative path, bytes)
/// pairs, sorted by path. Test and verification helper.
pub fn snapshot_tree(root: &Path) -> Result<Vec<(PathBuf, Vec<u8>)>> {
    fn visit(root: &Path, dir: &Path, out: &mut Vec<(PathBuf, Vec<u8>)>) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                visit(root, &path, out)?;
            } else {
                let rel = path
                    .strip_prefix(root)
                    .unwrap_or(&path)
                    .to_path_buf();
                out.push((rel, fs::read(&path)?));
            }
        }
        Ok(())
    }

    let mut out = Vec::new();
    visit(root, root, &mut out)?;
    out.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(out)
}

// =============================================================================
// Tests
// =============================================================================
