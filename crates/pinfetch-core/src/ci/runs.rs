//! Run locator: page through workflow runs until one built the commit.

use super::types::{RunRecord, RunsPage};
use super::CiClient;
use crate::error::FetchError;

/// Runs requested per page. A page shorter than this is the last one.
pub const RUNS_PAGE_SIZE: usize = 100;

/// First run in listing order whose head commit starts with `commit_id`.
pub fn find_run_in_page<'a>(runs: &'a [RunRecord], commit_id: &str) -> Option<&'a RunRecord> {
    runs.iter().find(|r| r.head_sha.starts_with(commit_id))
}

impl CiClient {
    /// Scan run listings page by page (newest first, provider default order).
    /// Stops at the first match, or fails after the first short page.
    pub async fn find_run(
        &self,
        owner: &str,
        repo: &str,
        commit_id: &str,
    ) -> Result<RunRecord, FetchError> {
        let mut page = 1u32;
        loop {
            let mut url = self.runs_endpoint(owner, repo, &[]);
            url.query_pairs_mut()
                .append_pair("per_page", &RUNS_PAGE_SIZE.to_string())
                .append_pair("page", &page.to_string());

            tracing::info!(%owner, %repo, %commit_id, page, "listing workflow runs");
            let listing: RunsPage = self.http.get_json(url.as_str(), Some(&self.token)).await?;

            if let Some(run) = find_run_in_page(&listing.workflow_runs, commit_id) {
                tracing::info!(run_id = run.id, page, "found workflow run");
                return Ok(run.clone());
            }
            if listing.workflow_runs.len() != RUNS_PAGE_SIZE {
                return Err(FetchError::RunNotFound {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                    commit_id: commit_id.to_string(),
                    pages: page,
                });
            }
            page += 1;
        }
    }
}
