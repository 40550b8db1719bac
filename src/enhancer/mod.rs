//! AI Enhancement
//!
//! Optionally enriches already-generated pages through an LLM provider.
//! Enhancement never blocks deterministic documentation from existing:
//! a missing credential fails only this step, a failed connectivity probe
//! aborts the run before any file is touched, and per-page call failures
//! are contained to the page they concern.
//!
//! ## Ownership
//!
//! Module pages are fully replaced by enhancement. The architecture
//! overview is generator-owned, so enhancement only appends (or replaces)
//! an "AI-Generated Insights" section below the generated content. The
//! enhancer never creates pages - page creation belongs to the generator.

pub mod prompt;

pub use prompt::EntitySummary;

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::ai::SharedProvider;
use crate::config::{Config, ModuleDescriptor, SourceConfig};
use crate::constants::{docs, enhancer as tuning};
use crate::types::{ChangeSet, DocflowError, ErrorCategory, Result};

/// Outcome of one enhancement run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EnhanceReport {
    /// Modules whose pages were rewritten
    pub enhanced: Vec<String>,
    /// Modules skipped (no existing page, or not in the catalogue)
    pub skipped: Vec<String>,
    /// Modules whose enhancement call failed (logged, siblings unaffected)
    pub failed: Vec<String>,
    /// The architecture insights section was updated
    pub architecture_updated: bool,
}

/// LLM-driven page enhancer
pub struct AiEnhancer {
    provider: SharedProvider,
    docs_dir: PathBuf,
    source: SourceConfig,
    modules: Vec<ModuleDescriptor>,
    rate_limit_backoff: Duration,
}

impl AiEnhancer {
    pub fn new(
        provider: SharedProvider,
        docs_dir: impl Into<PathBuf>,
        source: SourceConfig,
        modules: Vec<ModuleDescriptor>,
    ) -> Self {
        Self {
            provider,
            docs_dir: docs_dir.into(),
            source,
            modules,
            rate_limit_backoff: Duration::from_secs(tuning::RATE_LIMIT_BACKOFF_SECS),
        }
    }

    pub fn from_config(provider: SharedProvider, config: &Config) -> Self {
        Self::new(
            provider,
            config.docs.output_dir.clone(),
            config.source.clone(),
            config.modules.clone(),
        )
    }

    /// Override the rate-limit backoff (tests use a zero duration)
    pub fn with_rate_limit_backoff(mut self, backoff: Duration) -> Self {
        self.rate_limit_backoff = backoff;
        self
    }

    /// Enhance the pages affected by a change-set.
    ///
    /// Aborts before touching any file when the connectivity probe fails.
    /// After that, failures are per-page: one page's failure never aborts
    /// the remaining pages.
    pub async fn enhance(&self, change: &ChangeSet) -> Result<EnhanceReport> {
        match self.provider.health_check().await {
            Ok(true) => debug!(provider = self.provider.name(), "connectivity probe ok"),
            Ok(false) => {
                return Err(DocflowError::Config(format!(
                    "Provider '{}' connectivity probe failed; aborting enhancement",
                    self.provider.name()
                )));
            }
            Err(e) => return Err(e),
        }

        let mut report = EnhanceReport::default();

        // BTreeSet iteration gives a stable module order
        for module_name in &change.modules {
            match self.enhance_module(module_name).await {
                Ok(true) => report.enhanced.push(module_name.clone()),
                Ok(false) => report.skipped.push(module_name.clone()),
                Err(e) => {
                    warn!(module = %module_name, error = %e, "enhancement failed for module");
                    report.failed.push(module_name.clone());
                }
            }
        }

        if change.shared_layers_changed() {
            match self.enhance_architecture(change).await {
                Ok(updated) => report.architecture_updated = updated,
                Err(e) => {
                    warn!(error = %e, "architecture insights enhancement failed");
                }
            }
        }

        info!(
            enhanced = report.enhanced.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "enhancement run complete"
        );
        Ok(report)
    }

    /// Enhance one module page. Returns Ok(false) when skipped.
    async fn enhance_module(&self, module_name: &str) -> Result<bool> {
        let Some(module) = self.modules.iter().find(|m| m.name == module_name) else {
            debug!(module = module_name, "changed module not in catalogue, skipping");
            return Ok(false);
        };

        let page_path = self
            .docs_dir
            .join(docs::MODULES_DIR)
            .join(format!("{}.md", module_name));

        // Never create pages here: creation is the generator's job
        if !page_path.exists() {
            debug!(module = module_name, "no existing page, skipping enhancement");
            return Ok(false);
        }

        let current = fs::read_to_string(&page_path)?;
        let summaries = prompt::entity_summaries(&self.source, module);
        let request = prompt::module_prompt(module, &summaries, &current);

        let replacement = self.call_with_retry(prompt::SYSTEM_ROLE, &request).await?;

        fs::write(&page_path, replacement)?;
        info!(module = module_name, "module page enhanced");
        Ok(true)
    }

    /// Append (or replace) the insights section of the architecture overview.
    /// The page is generator-owned, so everything above the insights heading
    /// is preserved verbatim.
    async fn enhance_architecture(&self, change: &ChangeSet) -> Result<bool> {
        let page_path = self
            .docs_dir
            .join(docs::ARCHITECTURE_DIR)
            .join("overview.md");

        if !page_path.exists() {
            debug!("no architecture overview page, skipping insights");
            return Ok(false);
        }

        let current = fs::read_to_string(&page_path)?;
        // Strip a previous insights section so the append stays bounded
        let generator_owned = current
            .split(tuning::AI_INSIGHTS_HEADING)
            .next()
            .unwrap_or(&current)
            .trim_end();

        let request = prompt::architecture_prompt(change, generator_owned);
        let insights = self.call_with_retry(prompt::SYSTEM_ROLE, &request).await?;

        let updated = format!(
            "{}\n\n{}\n\n{}\n",
            generator_owned,
            tuning::AI_INSIGHTS_HEADING,
            insights.trim()
        );
        fs::write(&page_path, updated)?;
        info!("architecture insights updated");
        Ok(true)
    }

    /// One enhancement call with a bounded retry: on a rate-limit error,
    /// wait the fixed backoff and retry exactly once; a second rate-limit
    /// (or any other error) surfaces to the per-page handler.
    async fn call_with_retry(&self, system: &str, request: &str) -> Result<String> {
        let mut retried = false;
        loop {
            match self.provider.generate(system, request).await {
                Ok(text) => return Ok(text),
                Err(DocflowError::Llm(err))
                    if err.category == ErrorCategory::RateLimit && !retried =>
                {
                    retried = true;
                    let wait = err.retry_after.unwrap_or(self.rate_limit_backoff);
                    warn!(
                        wait_secs = wait.as_secs(),
                        "rate limited, retrying once after backoff"
                    );
                    sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::LlmProvider;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    use crate::types::LlmError;

    /// Provider that replays a script of responses and counts calls
    #[derive(Debug)]
    struct ScriptedProvider {
        script: Vec<std::result::Result<String, ErrorCategory>>,
        calls: AtomicUsize,
        healthy: bool,
    }

    impl ScriptedProvider {
        fn new(script: Vec<std::result::Result<String, ErrorCategory>>) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
                healthy: true,
            }
        }

        fn unhealthy() -> Self {
            Self {
                script: vec![],
                calls: AtomicUsize::new(0),
                healthy: false,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn generate(&self, _system: &str, _prompt: &str) -> Result<String> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.script.get(index) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(category)) => {
                    Err(DocflowError::Llm(LlmError::new(*category, "scripted error")))
                }
                None => Ok("unscripted response".to_string()),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-model"
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(self.healthy)
        }
    }

    fn setup(dir: &TempDir, provider: Arc<ScriptedProvider>) -> AiEnhancer {
        let docs = dir.path().join("docs");
        fs::create_dir_all(docs.join("modules")).unwrap();
        fs::create_dir_all(docs.join("architecture")).unwrap();
        fs::write(docs.join("modules/sales.md"), "# Module: sales\n").unwrap();
        fs::write(docs.join("modules/crm.md"), "# Module: crm\n").unwrap();
        fs::write(
            docs.join("architecture/overview.md"),
            "# Architecture Overview\n\nGenerated body.\n",
        )
        .unwrap();

        let source = SourceConfig {
            root: dir.path().join("src"),
            ..SourceConfig::default()
        };
        let modules = vec![
            ModuleDescriptor::new("sales", vec!["order".to_string()]),
            ModuleDescriptor::new("crm", vec!["contact".to_string()]),
        ];
        AiEnhancer::new(provider, docs, source, modules)
            .with_rate_limit_backoff(Duration::ZERO)
    }

    fn change_for(modules: &[&str]) -> ChangeSet {
        ChangeSet::from_modules(modules.iter().copied())
    }

    #[tokio::test]
    async fn test_enhances_existing_module_page() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("# Enhanced sales\n".into())]));
        let enhancer = setup(&dir, provider.clone());

        let report = enhancer.enhance(&change_for(&["sales"])).await.unwrap();

        assert_eq!(report.enhanced, vec!["sales"]);
        let page = fs::read_to_string(dir.path().join("docs/modules/sales.md")).unwrap();
        assert_eq!(page, "# Enhanced sales\n");
    }

    #[tokio::test]
    async fn test_missing_page_skipped_without_error() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let enhancer = setup(&dir, provider.clone());
        fs::remove_file(dir.path().join("docs/modules/sales.md")).unwrap();

        let report = enhancer.enhance(&change_for(&["sales"])).await.unwrap();

        assert_eq!(report.skipped, vec!["sales"]);
        assert!(report.enhanced.is_empty());
        // no content call was made, and no page was created
        assert_eq!(provider.calls(), 0);
        assert!(!dir.path().join("docs/modules/sales.md").exists());
    }

    #[tokio::test]
    async fn test_rate_limit_retried_exactly_once_then_succeeds() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ErrorCategory::RateLimit),
            Ok("# Enhanced after retry\n".into()),
        ]));
        let enhancer = setup(&dir, provider.clone());

        let report = enhancer.enhance(&change_for(&["sales"])).await.unwrap();

        assert_eq!(report.enhanced, vec!["sales"]);
        assert_eq!(provider.calls(), 2);
        let page = fs::read_to_string(dir.path().join("docs/modules/sales.md")).unwrap();
        assert_eq!(page, "# Enhanced after retry\n");
    }

    #[tokio::test]
    async fn test_second_rate_limit_skips_page_but_continues() {
        let dir = TempDir::new().unwrap();
        // crm sorts before sales: crm gets rate-limited twice, sales succeeds
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ErrorCategory::RateLimit),
            Err(ErrorCategory::RateLimit),
            Ok("# Enhanced sales\n".into()),
        ]));
        let enhancer = setup(&dir, provider.clone());

        let report = enhancer
            .enhance(&change_for(&["crm", "sales"]))
            .await
            .unwrap();

        assert_eq!(report.failed, vec!["crm"]);
        assert_eq!(report.enhanced, vec!["sales"]);
        // crm page untouched
        let crm = fs::read_to_string(dir.path().join("docs/modules/crm.md")).unwrap();
        assert_eq!(crm, "# Module: crm\n");
    }

    #[tokio::test]
    async fn test_non_rate_limit_failure_contained_to_page() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ErrorCategory::Network),
            Ok("# Enhanced sales\n".into()),
        ]));
        let enhancer = setup(&dir, provider.clone());

        let report = enhancer
            .enhance(&change_for(&["crm", "sales"]))
            .await
            .unwrap();

        // network errors are not retried
        assert_eq!(provider.calls(), 2);
        assert_eq!(report.failed, vec!["crm"]);
        assert_eq!(report.enhanced, vec!["sales"]);
    }

    #[tokio::test]
    async fn test_failed_probe_aborts_without_touching_files() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(ScriptedProvider::unhealthy());
        let enhancer = setup(&dir, provider.clone());

        let err = enhancer.enhance(&change_for(&["sales"])).await.unwrap_err();

        assert!(err.is_config());
        let page = fs::read_to_string(dir.path().join("docs/modules/sales.md")).unwrap();
        assert_eq!(page, "# Module: sales\n");
    }

    #[tokio::test]
    async fn test_architecture_insights_appended_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(
            "Shared types drifted.".into()
        )]));
        let enhancer = setup(&dir, provider.clone());

        let change = ChangeSet {
            types_changed: true,
            ..ChangeSet::new()
        };
        let report = enhancer.enhance(&change).await.unwrap();

        assert!(report.architecture_updated);
        let page =
            fs::read_to_string(dir.path().join("docs/architecture/overview.md")).unwrap();
        // generator-owned content preserved verbatim above the heading
        assert!(page.starts_with("# Architecture Overview\n\nGenerated body."));
        assert!(page.contains("## AI-Generated Insights\n\nShared types drifted."));
    }

    #[tokio::test]
    async fn test_insights_section_replaced_on_rerun() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok("First insight.".into()),
            Ok("Second insight.".into()),
        ]));
        let enhancer = setup(&dir, provider.clone());

        let change = ChangeSet {
            components_changed: true,
            ..ChangeSet::new()
        };
        enhancer.enhance(&change).await.unwrap();
        enhancer.enhance(&change).await.unwrap();

        let page =
            fs::read_to_string(dir.path().join("docs/architecture/overview.md")).unwrap();
        assert!(!page.contains("First insight."));
        assert!(page.contains("Second insight."));
        assert_eq!(page.matches("## AI-Generated Insights").count(), 1);
    }

    #[tokio::test]
    async fn test_module_not_in_catalogue_skipped() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let enhancer = setup(&dir, provider.clone());

        let report = enhancer.enhance(&change_for(&["unknown"])).await.unwrap();

        assert_eq!(report.skipped, vec!["unknown"]);
        assert_eq!(provider.calls(), 0);
    }
}
