//! Change Detection
//!
//! Classifies a sequence of file paths (from a diff or a filesystem event)
//! into a [`ChangeSet`]. Classification is shallow and lenient: it matches
//! path segments against the configured source layout and ignores anything
//! it does not recognize. No file is ever read and no error is raised -
//! this is classification, not validation.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::config::SourceConfig;
use crate::types::ChangeSet;

/// Pure classifier of file paths into change-sets.
///
/// Rules, in precedence order per path:
/// - a path whose suffix matches the configured type-declarations file sets
///   `types_changed`
/// - a path containing the module-root segment followed by a named directory
///   (`.../modules/<name>/...`) contributes `<name>` to `modules`
/// - a path under the shared components root sets `components_changed`;
///   under the shared services root sets `services_changed`
///
/// Every path, recognized or not, counts toward the distinct-path set that
/// drives the enhancement threshold.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    modules_dir: String,
    components_dir: String,
    services_dir: String,
    types_file: PathBuf,
}

impl ChangeDetector {
    pub fn new(
        modules_dir: impl Into<String>,
        components_dir: impl Into<String>,
        services_dir: impl Into<String>,
        types_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            modules_dir: modules_dir.into(),
            components_dir: components_dir.into(),
            services_dir: services_dir.into(),
            types_file: types_file.into(),
        }
    }

    pub fn from_config(source: &SourceConfig) -> Self {
        Self::new(
            source.modules_dir.clone(),
            source.components_dir.clone(),
            source.services_dir.clone(),
            source.types_file.clone(),
        )
    }

    /// Classify a batch of paths into a change-set. Pure function of its
    /// input; insertion order is irrelevant.
    pub fn classify<I, P>(&self, paths: I) -> ChangeSet
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut change = ChangeSet::new();
        for path in paths {
            self.classify_one(path.as_ref(), &mut change);
        }
        change
    }

    /// Classify a single path into an existing change-set
    fn classify_one(&self, path: &Path, change: &mut ChangeSet) {
        change.paths.insert(path.to_path_buf());

        if path.ends_with(&self.types_file) {
            trace!(path = %path.display(), "type declarations changed");
            change.types_changed = true;
            return;
        }

        let components: Vec<&str> = path
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .collect();

        if let Some(module) = self.module_name(&components) {
            trace!(path = %path.display(), module, "module changed");
            change.modules.insert(module.to_string());
            return;
        }

        if components.iter().any(|c| *c == self.components_dir) {
            trace!(path = %path.display(), "shared components changed");
            change.components_changed = true;
        } else if components.iter().any(|c| *c == self.services_dir) {
            trace!(path = %path.display(), "shared services changed");
            change.services_changed = true;
        }
    }

    /// Extract the module name from `.../modules/<name>/...`.
    /// The name must be followed by at least one more component, so a file
    /// sitting directly in the modules root names no module.
    fn module_name<'a>(&self, components: &[&'a str]) -> Option<&'a str> {
        components
            .windows(3)
            .find(|w| w[0] == self.modules_dir)
            .map(|w| w[1])
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ChangeDetector {
        ChangeDetector::from_config(&SourceConfig::default())
    }

    #[test]
    fn test_classifies_modules_and_types() {
        let change = detector().classify([
            "root/modules/sales/entities/order.x",
            "root/generated.d.ts",
        ]);

        assert_eq!(
            change.modules.iter().collect::<Vec<_>>(),
            vec![&"sales".to_string()]
        );
        assert!(change.types_changed);
        assert!(!change.components_changed);
        assert_eq!(change.distinct_paths(), 2);
    }

    #[test]
    fn test_shared_layer_flags() {
        let change = detector().classify([
            "src/components/shared/Button.vue",
            "src/services/http.ts",
        ]);

        assert!(change.components_changed);
        assert!(change.services_changed);
        assert!(change.modules.is_empty());
    }

    #[test]
    fn test_unrecognized_paths_ignored_but_counted() {
        let change = detector().classify(["README.md", "scripts/deploy.sh"]);

        assert!(change.modules.is_empty());
        assert!(!change.shared_layers_changed());
        // still count toward the threshold
        assert_eq!(change.distinct_paths(), 2);
    }

    #[test]
    fn test_module_name_requires_trailing_component() {
        // A file directly inside the modules root names no module
        let change = detector().classify(["src/modules/README.md"]);
        assert!(change.modules.is_empty());
    }

    #[test]
    fn test_multiple_files_same_module_deduplicate() {
        let change = detector().classify([
            "src/modules/crm/index.ts",
            "src/modules/crm/entities/contact.json",
            "src/modules/crm/i18n/en.json",
        ]);

        assert_eq!(change.modules.len(), 1);
        assert!(change.modules.contains("crm"));
        assert_eq!(change.distinct_paths(), 3);
    }

    #[test]
    fn test_types_file_takes_precedence_over_module_match() {
        let custom = ChangeDetector::new(
            "modules",
            "components",
            "services",
            "modules/shared/generated.d.ts",
        );
        let change = custom.classify(["src/modules/shared/generated.d.ts"]);
        assert!(change.types_changed);
        assert!(change.modules.is_empty());
    }

    #[test]
    fn test_classification_is_order_independent() {
        let paths = [
            "src/modules/a/x.ts",
            "src/modules/b/y.ts",
            "src/components/z.ts",
        ];
        let forward = detector().classify(paths);
        let mut reversed = paths;
        reversed.reverse();
        assert_eq!(forward, detector().classify(reversed));
    }
}
