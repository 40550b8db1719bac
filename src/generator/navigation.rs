//! Navigation Manifest
//!
//! A single structured document describing the docs tree for the static-site
//! renderer: tabs → groups → ordered page-reference lists. The manifest is
//! built from the same module catalogue as the pages themselves, so every
//! referenced path corresponds to a generated page and every api-reference
//! page appears exactly once.

use serde::{Deserialize, Serialize};

use crate::config::ModuleDescriptor;
use crate::constants::docs;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationManifest {
    /// Site title
    pub site: String,
    /// Grouped navigation tabs
    pub tabs: Vec<NavTab>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavTab {
    pub tab: String,
    pub groups: Vec<NavGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavGroup {
    pub group: String,
    /// Page paths relative to the docs root, in display order
    pub pages: Vec<String>,
}

impl NavigationManifest {
    /// Build the manifest from the module catalogue
    pub fn build(site_name: &str, modules: &[ModuleDescriptor]) -> Self {
        let overview_group = NavGroup {
            group: "Overview".to_string(),
            pages: vec![
                "index.md".to_string(),
                format!("{}/overview.md", docs::ARCHITECTURE_DIR),
                format!("{}/overview.md", docs::COMPONENTS_DIR),
            ],
        };

        let modules_group = NavGroup {
            group: "Modules".to_string(),
            pages: modules
                .iter()
                .map(|m| format!("{}/{}.md", docs::MODULES_DIR, m.name))
                .collect(),
        };

        let documentation_tab = NavTab {
            tab: "Documentation".to_string(),
            groups: vec![overview_group, modules_group],
        };

        // One group per module, one page per entity in declared order
        let api_tab = NavTab {
            tab: "API Reference".to_string(),
            groups: modules
                .iter()
                .map(|m| NavGroup {
                    group: m.name.clone(),
                    pages: m
                        .entities
                        .iter()
                        .map(|e| format!("{}/{}/{}.md", docs::API_REFERENCE_DIR, m.name, e))
                        .collect(),
                })
                .collect(),
        };

        Self {
            site: site_name.to_string(),
            tabs: vec![documentation_tab, api_tab],
        }
    }

    /// All page paths referenced by the manifest, in manifest order
    pub fn page_paths(&self) -> impl Iterator<Item = &str> {
        self.tabs
            .iter()
            .flat_map(|t| t.groups.iter())
            .flat_map(|g| g.pages.iter())
            .map(String::as_str)
    }

    /// Serialize to the on-disk manifest document
    pub fn to_json(&self) -> crate::types::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}
