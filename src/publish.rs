use crate::config::GitConfig;
use crate::error::{PortfolioError, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// The version-control operations publishing needs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Stages one path
    async fn stage(&self, path: &Path) -> Result<()>;
    /// Commits everything staged
    async fn commit(&self, message: &str) -> Result<()>;
    /// Pushes the current HEAD to `branch` on `remote`
    async fn push(&self, remote: &str, branch: &str) -> Result<()>;
}

/// Runs the `git` executable inside a working tree
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        debug!("git {} (in {})", args.join(" "), self.workdir.display());
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .await
            .map_err(|e| PortfolioError::Publish(format!("Failed to spawn git: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PortfolioError::Publish(format!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn stage(&self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.run(&["add", "--", &*path]).await.map(|_| ())
    }

    async fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message]).await.map(|_| ())
    }

    async fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", remote, branch]).await.map(|_| ())
    }
}

/// Commit message for a newly added project
pub fn commit_message(title: &str, page: &Path, gallery: &Path) -> String {
    format!(
        "Add project: {}\n\n- New project page: {}\n- Updated gallery: {}",
        title,
        page.display(),
        gallery.display()
    )
}

/// Stages, commits and pushes the generated files
pub struct Publisher<V: VersionControl> {
    vcs: V,
    git: GitConfig,
}

impl<V: VersionControl> Publisher<V> {
    pub fn new(vcs: V, git: GitConfig) -> Self {
        Self { vcs, git }
    }

    /// Publishes `paths` and returns the branch that accepted the push
    ///
    /// Staging failures are only logged. A failed commit, or a push that fails
    /// on both the primary and the fallback branch, is an error; nothing
    /// written to disk is undone.
    pub async fn publish(&self, paths: &[&Path], message: &str) -> Result<String> {
        for path in paths {
            if let Err(e) = self.vcs.stage(path).await {
                warn!("Could not stage {}: {}", path.display(), e);
            }
        }

        self.vcs.commit(message).await?;
        info!("Committed: {}", message.lines().next().unwrap_or_default());

        let remote = &self.git.remote;
        let primary = &self.git.primary_branch;
        match self.vcs.push(remote, primary).await {
            Ok(()) => return Ok(primary.clone()),
            Err(e) => warn!("Push to {}/{} failed: {}", remote, primary, e),
        }

        let fallback = &self.git.fallback_branch;
        if fallback.is_empty() || fallback == primary {
            return Err(PortfolioError::Publish(format!("Push to {}/{} failed", remote, primary)));
        }
        self.vcs.push(remote, fallback).await.map_err(|e| {
            PortfolioError::Publish(format!(
                "Push failed on both {} and {}: {}",
                primary, fallback, e
            ))
        })?;
        Ok(fallback.clone())
    }
}
