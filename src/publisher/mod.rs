//! Publishing
//!
//! Commits produced documentation to version control. Staging is
//! all-or-nothing (`git add -A`), the commit message embeds the triggering
//! change-set and a UTC timestamp, and pushing is opt-in configuration.
//! A clean working tree is a silent no-op, not an error.

use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info, warn};

use crate::config::PublishConfig;
use crate::types::{ChangeSet, DocflowError, Result};

/// Outcome of one publish attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Changes committed (short hash when resolvable)
    Committed { hash: String },
    /// Working tree was clean, nothing to do
    CleanTree,
    /// Target directory is not a git repository
    NotARepo,
}

/// Diff-aware git publisher
pub struct Publisher {
    repo_dir: PathBuf,
    push: bool,
    remote: String,
    branch: Option<String>,
}

impl Publisher {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            push: false,
            remote: "origin".to_string(),
            branch: None,
        }
    }

    pub fn from_config(config: &PublishConfig) -> Self {
        Self {
            repo_dir: config
                .repo_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(".")),
            push: config.push,
            remote: config.remote.clone(),
            branch: config.branch.clone(),
        }
    }

    /// Enable pushing after commit
    pub fn with_push(mut self, push: bool) -> Self {
        self.push = push;
        self
    }

    /// Commit pending changes, if any.
    pub fn publish(&self, change: &ChangeSet) -> Result<PublishOutcome> {
        if !self.is_git_repo() {
            warn!(dir = %self.repo_dir.display(), "not a git repository, skipping publish");
            return Ok(PublishOutcome::NotARepo);
        }

        if self.working_tree_clean()? {
            debug!("working tree clean, nothing to publish");
            return Ok(PublishOutcome::CleanTree);
        }

        self.git(&["add", "-A"])?;

        let message = commit_message(change);
        self.git(&["commit", "-m", &message])?;

        let hash = self
            .git_output(&["rev-parse", "--short", "HEAD"])
            .unwrap_or_else(|_| "unknown".to_string());
        info!(hash = %hash, "documentation changes committed");

        if self.push {
            self.push_head()?;
        }

        Ok(PublishOutcome::Committed { hash })
    }

    fn is_git_repo(&self) -> bool {
        Command::new("git")
            .args(["rev-parse", "--git-dir"])
            .current_dir(&self.repo_dir)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn working_tree_clean(&self) -> Result<bool> {
        let status = self.git_output(&["status", "--porcelain"])?;
        Ok(status.trim().is_empty())
    }

    fn push_head(&self) -> Result<()> {
        let mut args = vec!["push", self.remote.as_str()];
        if let Some(branch) = &self.branch {
            args.push(branch.as_str());
        }
        self.git(&args)?;
        info!(remote = %self.remote, "pushed documentation changes");
        Ok(())
    }

    /// Run a git command, failing on non-zero exit
    fn git(&self, args: &[&str]) -> Result<()> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .map_err(DocflowError::Io)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DocflowError::Publish(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )));
        }
        Ok(())
    }

    /// Run a git command and capture trimmed stdout
    fn git_output(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .map_err(DocflowError::Io)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DocflowError::Publish(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Commit message embedding the triggering change-set and a UTC timestamp
fn commit_message(change: &ChangeSet) -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    format!(
        "docs: regenerate documentation\n\n\
         Change-set: {}\n\
         Generated by docflow at {}",
        change.summary(),
        timestamp
    )
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn init_repo(dir: &TempDir) {
        for args in [
            vec!["init", "-q"],
            vec!["config", "user.email", "ci@example.com"],
            vec!["config", "user.name", "CI"],
        ] {
            let status = Command::new("git")
                .args(&args)
                .current_dir(dir.path())
                .status()
                .unwrap();
            assert!(status.success());
        }
    }

    fn commit_count(dir: &TempDir) -> usize {
        Command::new("git")
            .args(["rev-list", "--count", "HEAD"])
            .current_dir(dir.path())
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|o| {
                String::from_utf8_lossy(&o.stdout)
                    .trim()
                    .parse()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }

    #[test]
    fn test_commit_message_embeds_changeset() {
        let mut change = ChangeSet::from_modules(["sales", "crm"]);
        change.types_changed = true;

        let message = commit_message(&change);
        assert!(message.contains("crm, sales"));
        assert!(message.contains("types: true"));
        assert!(message.contains("UTC"));
    }

    #[test]
    fn test_not_a_repo_is_soft_outcome() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let outcome = Publisher::new(dir.path())
            .publish(&ChangeSet::new())
            .unwrap();
        assert_eq!(outcome, PublishOutcome::NotARepo);
    }

    #[test]
    fn test_clean_tree_is_noop() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        init_repo(&dir);

        let outcome = Publisher::new(dir.path())
            .publish(&ChangeSet::new())
            .unwrap();
        assert_eq!(outcome, PublishOutcome::CleanTree);
        assert_eq!(commit_count(&dir), 0);
    }

    #[test]
    fn test_dirty_tree_committed_then_clean() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        init_repo(&dir);
        fs::write(dir.path().join("docs.md"), "# Docs\n").unwrap();

        let publisher = Publisher::new(dir.path());
        let change = ChangeSet::from_modules(["sales"]);

        let first = publisher.publish(&change).unwrap();
        assert!(matches!(first, PublishOutcome::Committed { .. }));
        assert_eq!(commit_count(&dir), 1);

        // Second run with nothing changed is a silent no-op
        let second = publisher.publish(&change).unwrap();
        assert_eq!(second, PublishOutcome::CleanTree);
        assert_eq!(commit_count(&dir), 1);
    }
}
