//! Prompt Construction
//!
//! Builds the request content for enhancement calls: a fixed role preamble,
//! a structured summary of the module's current entities, and the page text
//! being replaced. Entity summaries come from shallow reads of the entity
//! definition files - lenient, never an error.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::config::{ModuleDescriptor, SourceConfig};
use crate::types::ChangeSet;

/// Fixed role/context description sent as the system message
pub const SYSTEM_ROLE: &str = "You are a technical writer maintaining the documentation site of a \
modular business application. You rewrite documentation pages to be clearer and more complete \
while keeping every stated fact accurate. Respond with the full replacement Markdown for the \
page, and nothing else.";

/// Structured summary of one entity, derived from its definition file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySummary {
    pub name: String,
    pub field_count: usize,
    pub has_relationships: bool,
}

/// Shallow-read entity definitions for a module.
///
/// Each entity may have a `<entities_dir>/<name>.json` file with a `fields`
/// array and a `relationships` key. Missing or malformed files degrade to
/// zero fields and no relationships - classification stays lenient.
pub fn entity_summaries(source: &SourceConfig, module: &ModuleDescriptor) -> Vec<EntitySummary> {
    let entities_dir = source.module_entities_dir(&module.name);
    module
        .entities
        .iter()
        .map(|entity| summarize_entity(&entities_dir, entity))
        .collect()
}

fn summarize_entity(entities_dir: &Path, entity: &str) -> EntitySummary {
    let path = entities_dir.join(format!("{}.json", entity));
    let parsed: Option<Value> = fs::read_to_string(&path)
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok());

    match parsed {
        Some(value) => EntitySummary {
            name: entity.to_string(),
            field_count: value
                .get("fields")
                .and_then(Value::as_array)
                .map(Vec::len)
                .unwrap_or(0),
            has_relationships: value
                .get("relationships")
                .map(|r| match r {
                    Value::Array(a) => !a.is_empty(),
                    Value::Object(o) => !o.is_empty(),
                    Value::Null => false,
                    _ => true,
                })
                .unwrap_or(false),
        },
        None => {
            debug!(entity, path = %path.display(), "no readable entity definition");
            EntitySummary {
                name: entity.to_string(),
                field_count: 0,
                has_relationships: false,
            }
        }
    }
}

/// Prompt for rewriting one module page
pub fn module_prompt(
    module: &ModuleDescriptor,
    summaries: &[EntitySummary],
    current_page: &str,
) -> String {
    let mut prompt = format!(
        "Rewrite the documentation page for the `{}` module.\n\n\
         Current entity structure:\n",
        module.name
    );

    if summaries.is_empty() {
        prompt.push_str("- (no entities declared)\n");
    }
    for summary in summaries {
        prompt.push_str(&format!(
            "- {}: {} fields, relationships: {}\n",
            summary.name,
            summary.field_count,
            if summary.has_relationships { "yes" } else { "no" }
        ));
    }

    prompt.push_str(&format!(
        "\nCurrent page content:\n\n---\n{}\n---\n\n\
         Produce the full replacement Markdown for this page. Keep the\n\
         heading structure and all links intact.",
        current_page
    ));

    prompt
}

/// Prompt for the architecture insights section.
///
/// The response is appended below the generator-owned content, so the model
/// is asked for a section body rather than a full page.
pub fn architecture_prompt(change: &ChangeSet, current_page: &str) -> String {
    format!(
        "The following shared layers of the application changed: types: {}, \
         components: {}, services: {}.\n\n\
         Current architecture overview:\n\n---\n{}\n---\n\n\
         Write a short analysis (Markdown, no top-level heading) of what these\n\
         changes imply for the system architecture and which documentation\n\
         readers should take note.",
        change.types_changed, change.components_changed, change.services_changed, current_page
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_summaries_from_definition_files() {
        let dir = TempDir::new().unwrap();
        let source = SourceConfig {
            root: dir.path().join("src"),
            ..SourceConfig::default()
        };
        let entities_dir = source.module_entities_dir("sales");
        fs::create_dir_all(&entities_dir).unwrap();
        fs::write(
            entities_dir.join("order.json"),
            r#"{"fields": [{"name": "id"}, {"name": "total"}], "relationships": ["invoice"]}"#,
        )
        .unwrap();

        let module = ModuleDescriptor::new(
            "sales",
            vec!["order".to_string(), "invoice".to_string()],
        );
        let summaries = entity_summaries(&source, &module);

        assert_eq!(
            summaries[0],
            EntitySummary {
                name: "order".to_string(),
                field_count: 2,
                has_relationships: true,
            }
        );
        // invoice.json does not exist: lenient degradation
        assert_eq!(summaries[1].field_count, 0);
        assert!(!summaries[1].has_relationships);
    }

    #[test]
    fn test_malformed_definition_degrades() {
        let dir = TempDir::new().unwrap();
        let source = SourceConfig {
            root: dir.path().join("src"),
            ..SourceConfig::default()
        };
        let entities_dir = source.module_entities_dir("crm");
        fs::create_dir_all(&entities_dir).unwrap();
        fs::write(entities_dir.join("contact.json"), "{ not json").unwrap();

        let module = ModuleDescriptor::new("crm", vec!["contact".to_string()]);
        let summaries = entity_summaries(&source, &module);
        assert_eq!(summaries[0].field_count, 0);
    }

    #[test]
    fn test_module_prompt_includes_summary_and_page() {
        let module = ModuleDescriptor::new("sales", vec!["order".to_string()]);
        let summaries = vec![EntitySummary {
            name: "order".to_string(),
            field_count: 3,
            has_relationships: false,
        }];

        let prompt = module_prompt(&module, &summaries, "# Module: sales");
        assert!(prompt.contains("- order: 3 fields, relationships: no"));
        assert!(prompt.contains("# Module: sales"));
    }

    #[test]
    fn test_architecture_prompt_names_changed_layers() {
        let change = ChangeSet {
            types_changed: true,
            ..ChangeSet::new()
        };
        let prompt = architecture_prompt(&change, "# Architecture Overview");
        assert!(prompt.contains("types: true"));
        assert!(prompt.contains("components: false"));
    }
}
