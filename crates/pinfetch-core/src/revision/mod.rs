//! Revision resolution: which repository, commit and platform build to fetch.
//!
//! Reads the tracked submodule's remote URL and pinned commit from git, and
//! maps the running platform to the tag CI uses in artifact names.

mod git;
mod platform;
mod remote;
mod status;

pub use git::{GitCli, GitMetadata};
pub use platform::{Platform, PlatformTag};
pub use remote::parse_owner_repo;
pub use status::{extract_commit_id, is_commit_id, COMMIT_ID_LEN};

use crate::error::FetchError;

/// Everything needed to locate the CI build of the pinned commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionInfo {
    pub owner: String,
    pub repo: String,
    /// Full 40-char lowercase hex commit id.
    pub commit_id: String,
    pub platform: PlatformTag,
}

impl RevisionInfo {
    /// Pre-flight check run before any network access.
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.owner.trim().is_empty() {
            return Err(FetchError::IncompleteRevision("owner is empty".to_string()));
        }
        if self.repo.trim().is_empty() {
            return Err(FetchError::IncompleteRevision("repo is empty".to_string()));
        }
        if !is_commit_id(&self.commit_id) {
            return Err(FetchError::IncompleteRevision(format!(
                "commit id {:?} is not a full lowercase SHA-1",
                self.commit_id
            )));
        }
        Ok(())
    }

    /// Artifact name CI uploads for this revision: `<prefix>-<commit>-<platform>`.
    pub fn artifact_name(&self, prefix: &str) -> String {
        format!("{}-{}-{}", prefix, self.commit_id, self.platform)
    }
}

/// Resolves a [`RevisionInfo`] for one submodule.
#[derive(Debug, Clone)]
pub struct RevisionResolver<G> {
    git: G,
    component: String,
    submodule_path: String,
    platform: Platform,
}

impl<G: GitMetadata> RevisionResolver<G> {
    pub fn new(git: G, component: impl Into<String>, submodule_path: impl Into<String>) -> Self {
        Self {
            git,
            component: component.into(),
            submodule_path: submodule_path.into(),
            platform: Platform::current(),
        }
    }

    /// Override the platform (cross-fetching, tests).
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub async fn resolve(&self) -> Result<RevisionInfo, FetchError> {
        let platform = self
            .platform
            .tag()
            .ok_or_else(|| FetchError::UnsupportedPlatform {
                os: self.platform.os.clone(),
                arch: self.platform.arch.clone(),
            })?;

        let url = self.git.submodule_url(&self.component).await?;
        let (owner, repo) = parse_owner_repo(&url).ok_or_else(|| {
            FetchError::Resolution(format!(
                "cannot parse owner/repo from submodule {} url {:?}",
                self.component, url
            ))
        })?;

        let status = self.git.submodule_status(&self.submodule_path).await?;
        let commit_id = extract_commit_id(&status).ok_or_else(|| {
            FetchError::Resolution(format!(
                "no commit id in submodule status for {}: {:?}",
                self.submodule_path,
                status.trim()
            ))
        })?;

        tracing::info!(%owner, %repo, %commit_id, %platform, "resolved submodule revision");

        Ok(RevisionInfo {
            owner,
            repo,
            commit_id,
            platform,
        })
    }
}
