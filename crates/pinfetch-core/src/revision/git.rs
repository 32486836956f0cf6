//! Version-control reads behind a trait so the resolver can run without a checkout.

use std::future::Future;
use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::error::FetchError;

/// Source of the two pieces of submodule metadata the resolver needs.
pub trait GitMetadata {
    /// Remote URL configured for submodule `name` in `.gitmodules`.
    fn submodule_url(&self, name: &str) -> impl Future<Output = Result<String, FetchError>> + Send;

    /// Raw `git submodule status` output for the submodule at `path`.
    fn submodule_status(&self, path: &str)
        -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Runs the `git` binary in a repository root.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_root: PathBuf,
}

impl GitCli {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    async fn run(&self, args: &[&str]) -> Result<String, FetchError> {
        tracing::debug!(?args, root = %self.repo_root.display(), "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_root)
            .output()
            .await
            .map_err(|e| FetchError::Resolution(format!("cannot run git: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::Resolution(format!(
                "git {} exited with {}: {}",
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl GitMetadata for GitCli {
    async fn submodule_url(&self, name: &str) -> Result<String, FetchError> {
        let key = format!("submodule.{name}.url");
        let out = self
            .run(&["config", "--file", ".gitmodules", "--get", &key])
            .await?;
        Ok(out.trim().to_string())
    }

    async fn submodule_status(&self, path: &str) -> Result<String, FetchError> {
        let rel = format!("./{}", path.trim_start_matches("./"));
        self.run(&["submodule", "status", &rel]).await
    }
}
