//! Change-Set Model
//!
//! The unit of work flowing through the pipeline: which modules changed,
//! whether shared layers changed, and the distinct paths that contributed.
//!
//! A change-set is immutable once produced by the detector; the aggregator
//! only ever merges change-sets (set union plus boolean OR), so merging is
//! commutative and associative and batches can coalesce in any order.

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Aggregated record of what changed, driving which regeneration and
/// enhancement steps run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    /// Affected module names, deduplicated
    pub modules: BTreeSet<String>,
    /// Distinct file paths that contributed to this change-set.
    /// Drives the enhancement threshold policy and failure replay logs.
    pub paths: BTreeSet<PathBuf>,
    /// The shared generated type-declarations file changed
    pub types_changed: bool,
    /// A file under the shared components root changed
    pub components_changed: bool,
    /// A file under the shared services root changed
    pub services_changed: bool,
}

impl ChangeSet {
    /// An empty change-set
    pub fn new() -> Self {
        Self::default()
    }

    /// Change-set naming modules directly (CI entry point, no paths involved)
    pub fn from_modules<I, S>(modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            modules: modules.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Merge another change-set into this one: set union of modules and
    /// paths, boolean OR of the shared-layer flags.
    pub fn merge(&mut self, other: ChangeSet) {
        self.modules.extend(other.modules);
        self.paths.extend(other.paths);
        self.types_changed |= other.types_changed;
        self.components_changed |= other.components_changed;
        self.services_changed |= other.services_changed;
    }

    /// Number of distinct changed paths in this change-set
    pub fn distinct_paths(&self) -> usize {
        self.paths.len()
    }

    /// True when nothing at all was recorded
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
            && self.paths.is_empty()
            && !self.types_changed
            && !self.components_changed
            && !self.services_changed
    }

    /// True when any shared layer (types, components, services) changed
    pub fn shared_layers_changed(&self) -> bool {
        self.types_changed || self.components_changed || self.services_changed
    }

    /// One-line summary for logs and commit messages
    pub fn summary(&self) -> String {
        let modules = if self.modules.is_empty() {
            "none".to_string()
        } else {
            self.modules
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "modules: [{}], types: {}, components: {}, services: {}, paths: {}",
            modules,
            self.types_changed,
            self.components_changed,
            self.services_changed,
            self.paths.len()
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
