//! CI provider REST client: find the run that built a commit and its artifact.
//!
//! Endpoints (GitHub Actions layout):
//! - `GET {api}/repos/{owner}/{repo}/actions/runs?per_page=100&page=N`
//! - `GET {api}/repos/{owner}/{repo}/actions/runs/{id}/artifacts`
//!
//! Every request carries the bearer token.

mod artifacts;
mod runs;
mod types;

pub use artifacts::select_artifact;
pub use runs::{find_run_in_page, RUNS_PAGE_SIZE};
pub use types::{ArtifactRecord, RunRecord};

use url::Url;

use crate::error::FetchError;
use crate::http::HttpClient;
use crate::token::AccessToken;

/// Authenticated client for one CI provider API root.
#[derive(Debug, Clone)]
pub struct CiClient {
    http: HttpClient,
    api_base: Url,
    token: AccessToken,
}

impl CiClient {
    pub fn new(http: HttpClient, api_base: &str, token: AccessToken) -> Result<Self, FetchError> {
        let api_base = Url::parse(api_base).map_err(|e| FetchError::InvalidUrl {
            url: api_base.to_string(),
            reason: e.to_string(),
        })?;
        if api_base.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl {
                url: api_base.to_string(),
                reason: "not a base URL".to_string(),
            });
        }
        Ok(Self {
            http,
            api_base,
            token,
        })
    }

    /// `{api}/repos/{owner}/{repo}/actions/runs` plus extra path segments.
    fn runs_endpoint(&self, owner: &str, repo: &str, extra: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", owner, repo, "actions", "runs"])
                .extend(extra);
        }
        url
    }
}
