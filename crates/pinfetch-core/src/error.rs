//! Error taxonomy for the fetch pipeline.
//!
//! Every stage returns one of these; the pipeline stops on the first one.

use std::path::PathBuf;

/// Body text that marks a 403 as a token missing the `actions` scope.
pub const ACTIONS_SCOPE_MARKER: &str = "actions scope";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Submodule URL or status could not be turned into owner/repo/commit.
    #[error("cannot resolve revision: {0}")]
    Resolution(String),

    /// No platform tag for this OS/arch; there is no build to fetch.
    #[error("no build is available for this platform ({os}-{arch})")]
    UnsupportedPlatform { os: String, arch: String },

    /// Resolved tuple failed pre-flight validation.
    #[error("revision info is incomplete: {0}")]
    IncompleteRevision(String),

    #[error("environment variable {var} is not set; an access token is required to download artifacts")]
    MissingToken { var: String },

    #[error("no workflow run found for commit {commit_id} in {owner}/{repo} (scanned {pages} page(s))")]
    RunNotFound {
        owner: String,
        repo: String,
        commit_id: String,
        pages: u32,
    },

    #[error("no artifact matching {pattern:?} in run {run_id}; available: {candidates:?}")]
    ArtifactNotFound {
        pattern: String,
        run_id: u64,
        candidates: Vec<String>,
    },

    #[error("HTTP {status} from {url}: {body_excerpt}")]
    Http {
        url: String,
        status: u32,
        body_excerpt: String,
    },

    /// 403 where the provider says the token lacks the `actions` scope.
    #[error("HTTP {status} from {url}: the access token lacks the `actions` scope; create a token with that scope and export it ({body_excerpt})")]
    InsufficientScope {
        url: String,
        status: u32,
        body_excerpt: String,
    },

    #[error("downloaded file is neither zip nor gzip; first bytes: {preview:?}")]
    UnsupportedFormat { preview: String },

    #[error("extraction failed: {cause}")]
    Extraction { cause: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A blocking worker panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// True for HTTP status failures, including the insufficient-scope case.
    pub fn is_http(&self) -> bool {
        matches!(
            self,
            FetchError::Http { .. } | FetchError::InsufficientScope { .. }
        )
    }

    /// Status code for HTTP failures.
    pub fn http_status(&self) -> Option<u32> {
        match self {
            FetchError::Http { status, .. } | FetchError::InsufficientScope { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Classify a non-success response. A 403 mentioning the actions scope gets
    /// its own variant so the message tells the user what to fix.
    pub fn from_status(url: &str, status: u32, body_excerpt: String) -> Self {
        if status == 403 && body_excerpt.contains(ACTIONS_SCOPE_MARKER) {
            FetchError::InsufficientScope {
                url: url.to_string(),
                status,
                body_excerpt,
            }
        } else {
            FetchError::Http {
                url: url.to_string(),
                status,
                body_excerpt,
            }
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn task(e: tokio::task::JoinError) -> Self {
        FetchError::Task(e.to_string())
    }

    pub(crate) fn extraction(cause: impl std::fmt::Display) -> Self {
        FetchError::Extraction {
            cause: cause.to_string(),
        }
    }
}

pub type Result<T, E = FetchError> = std::result::Result<T, E>;
