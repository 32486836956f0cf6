//! Artifact locator: pick the run artifact whose name matches the pattern.

use super::types::{ArtifactRecord, ArtifactsPage};
use super::CiClient;
use crate::error::FetchError;

/// Case-insensitive, tiered match: exact name, then name starting with the
/// pattern, then name containing it. Each tier scans the whole list before
/// the next is tried; within a tier the first entry wins.
pub fn select_artifact<'a>(
    artifacts: &'a [ArtifactRecord],
    pattern: &str,
) -> Option<&'a ArtifactRecord> {
    let pattern = pattern.to_lowercase();
    let names: Vec<String> = artifacts.iter().map(|a| a.name.to_lowercase()).collect();

    let exact = names.iter().position(|n| *n == pattern);
    let prefix = || names.iter().position(|n| n.starts_with(&pattern));
    let substring = || names.iter().position(|n| n.contains(&pattern));
    exact
        .or_else(prefix)
        .or_else(substring)
        .map(|i| &artifacts[i])
}

impl CiClient {
    /// Fetch the run's artifact list (single page) and select by `pattern`.
    pub async fn find_artifact(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
        pattern: &str,
    ) -> Result<ArtifactRecord, FetchError> {
        let id = run_id.to_string();
        let url = self.runs_endpoint(owner, repo, &[id.as_str(), "artifacts"]);

        tracing::info!(%owner, %repo, run_id, %pattern, "listing run artifacts");
        let listing: ArtifactsPage = self.http.get_json(url.as_str(), Some(&self.token)).await?;
        let candidates: Vec<&str> = listing.artifacts.iter().map(|a| a.name.as_str()).collect();
        tracing::debug!(?candidates, "run artifacts");

        match select_artifact(&listing.artifacts, pattern) {
            Some(artifact) => {
                tracing::info!(name = %artifact.name, url = %artifact.download_url, "found artifact");
                Ok(artifact.clone())
            }
            None => Err(FetchError::ArtifactNotFound {
                pattern: pattern.to_string(),
                run_id,
                candidates: candidates.into_iter().map(String::from).collect(),
            }),
        }
    }
}
