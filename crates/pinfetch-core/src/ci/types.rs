//! Wire types for the workflow-runs and run-artifacts endpoints.
//!
//! Only the fields the pipeline reads are modeled; everything else is ignored.

use serde::Deserialize;

/// One workflow run from the listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunRecord {
    pub id: u64,
    pub head_sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunsPage {
    #[serde(default)]
    pub workflow_runs: Vec<RunRecord>,
}

/// One downloadable output of a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtifactRecord {
    pub name: String,
    #[serde(rename = "archive_download_url")]
    pub download_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtifactsPage {
    #[serde(default)]
    pub artifacts: Vec<ArtifactRecord>,
}
