//! Page Materialization
//!
//! Pure template functions producing the Markdown content of every
//! generator-owned page. All content is a deterministic function of the
//! module catalogue: counts are derived at render time and can never drift
//! from configuration, and no timestamps or random values appear anywhere,
//! so regeneration with unchanged input is byte-identical.

use crate::config::ModuleDescriptor;
use crate::constants::docs;

/// Top-level index / introduction page
pub fn index_page(site_name: &str, modules: &[ModuleDescriptor]) -> String {
    let total_entities: usize = modules.iter().map(|m| m.entities.len()).sum();
    let mut page = format!(
        "# {}\n\n\
         Welcome to the {} documentation.\n\n\
         This site is regenerated automatically from the application's module\n\
         catalogue. It currently covers **{} modules** and **{} entities**.\n\n\
         ## Contents\n\n\
         - [Architecture Overview]({}/overview.md)\n\
         - [Shared Components]({}/overview.md)\n\n\
         ## Modules\n\n",
        site_name,
        site_name,
        modules.len(),
        total_entities,
        docs::ARCHITECTURE_DIR,
        docs::COMPONENTS_DIR,
    );

    for module in modules {
        page.push_str(&format!(
            "- [{}]({}/{}.md) - {} entities\n",
            module.name,
            docs::MODULES_DIR,
            module.name,
            module.entities.len()
        ));
    }

    page.push('\n');
    page
}

/// Architecture overview page.
///
/// Generator-owned: the enhancer may only append an insights section after
/// this content, never rewrite it.
pub fn architecture_overview(site_name: &str, modules: &[ModuleDescriptor]) -> String {
    let with_services = modules.iter().filter(|m| m.has_services).count();
    let with_tests = modules.iter().filter(|m| m.has_tests).count();

    let mut page = format!(
        "# Architecture Overview\n\n\
         {} is organized into {} modules, each owning its business entities\n\
         and optional service and test layers.\n\n\
         | Metric | Count |\n\
         |--------|-------|\n\
         | Modules | {} |\n\
         | Entities | {} |\n\
         | Modules with services | {} |\n\
         | Modules with tests | {} |\n\n\
         ## Module Map\n\n",
        site_name,
        modules.len(),
        modules.len(),
        modules.iter().map(|m| m.entities.len()).sum::<usize>(),
        with_services,
        with_tests,
    );

    for module in modules {
        page.push_str(&format!("### {}\n\n", module.name));
        if module.entities.is_empty() {
            page.push_str("No entities declared.\n\n");
        } else {
            page.push_str(&format!("Entities: {}.\n\n", module.entities.join(", ")));
        }
    }

    page
}

/// Shared components overview page
pub fn components_overview(modules: &[ModuleDescriptor]) -> String {
    format!(
        "# Shared Components\n\n\
         Components in the shared layer are reused across all {} modules.\n\
         Changes under the shared components root trigger regeneration of\n\
         every dependent page.\n",
        modules.len()
    )
}

/// Per-module overview page, listing entities in their declared order
pub fn module_page(module: &ModuleDescriptor) -> String {
    let mut page = format!(
        "# Module: {}\n\n\
         The `{}` module defines {} entities.\n\n\
         ## Entities\n\n",
        module.name,
        module.name,
        module.entities.len()
    );

    for entity in &module.entities {
        page.push_str(&format!(
            "- [{}](../{}/{}/{}.md)\n",
            entity,
            docs::API_REFERENCE_DIR,
            module.name,
            entity
        ));
    }

    if module.has_services {
        page.push_str(&format!(
            "\n## Services\n\n\
             The `{}` module exposes a dedicated service layer. Service\n\
             endpoints operate on the entities listed above.\n",
            module.name
        ));
    }

    if module.has_tests {
        page.push_str(&format!(
            "\n## Testing\n\n\
             The `{}` module ships with its own test suite covering entity\n\
             validation and service behavior.\n",
            module.name
        ));
    }

    page.push('\n');
    page
}

/// Per-entity API reference page
pub fn entity_page(module: &ModuleDescriptor, entity: &str) -> String {
    format!(
        "# {}\n\n\
         API reference for the `{}` entity of the `{}` module.\n\n\
         ## Endpoints\n\n\
         | Operation | Route |\n\
         |-----------|-------|\n\
         | List | `GET /api/{}/{}` |\n\
         | Read | `GET /api/{}/{}/:id` |\n\
         | Create | `POST /api/{}/{}` |\n\
         | Update | `PUT /api/{}/{}/:id` |\n\
         | Delete | `DELETE /api/{}/{}/:id` |\n\n\
         See the [module overview](../../{}/{}.md) for related entities.\n",
        entity,
        entity,
        module.name,
        module.name,
        entity,
        module.name,
        entity,
        module.name,
        entity,
        module.name,
        entity,
        module.name,
        entity,
        docs::MODULES_DIR,
        module.name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue() -> Vec<ModuleDescriptor> {
        vec![
            ModuleDescriptor {
                name: "sales".to_string(),
                entities: vec!["order".to_string(), "invoice".to_string()],
                has_services: true,
                has_tests: true,
            },
            ModuleDescriptor::new("crm", vec!["contact".to_string()]),
        ]
    }

    #[test]
    fn test_index_counts_match_catalogue() {
        let page = index_page("Acme", &catalogue());
        assert!(page.contains("**2 modules**"));
        assert!(page.contains("**3 entities**"));
    }

    #[test]
    fn test_module_page_lists_entities_in_order() {
        let modules = catalogue();
        let page = module_page(&modules[0]);
        let order_pos = page.find("[order]").unwrap();
        let invoice_pos = page.find("[invoice]").unwrap();
        assert!(order_pos < invoice_pos);
    }

    #[test]
    fn test_optional_sections_follow_flags() {
        let modules = catalogue();
        let sales = module_page(&modules[0]);
        assert!(sales.contains("## Services"));
        assert!(sales.contains("## Testing"));

        let crm = module_page(&modules[1]);
        assert!(!crm.contains("## Services"));
        assert!(!crm.contains("## Testing"));
    }

    #[test]
    fn test_entity_page_references_module() {
        let modules = catalogue();
        let page = entity_page(&modules[0], "order");
        assert!(page.contains("`GET /api/sales/order`"));
        assert!(page.contains("../../modules/sales.md"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let modules = catalogue();
        assert_eq!(
            architecture_overview("Acme", &modules),
            architecture_overview("Acme", &modules)
        );
    }
}
