//! End-to-end fetch: resolve, locate run and artifact, download, sniff, extract.
//!
//! Stages run strictly in order and the first error ends the run.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc::Sender;

use crate::archive::{sniff_file, ArchiveKind, Extractor};
use crate::ci::CiClient;
use crate::config::PinfetchConfig;
use crate::error::FetchError;
use crate::fetch::{DownloadProgress, Fetcher};
use crate::http::{ClientOptions, HttpClient};
use crate::revision::{GitCli, GitMetadata, RevisionInfo, RevisionResolver};
use crate::token::AccessToken;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    pub revision: RevisionInfo,
    pub run_id: u64,
    pub artifact_name: String,
    pub bytes_written: u64,
    /// Format of the downloaded file as sniffed (outer layer).
    pub archive_kind: ArchiveKind,
    pub output_dir: PathBuf,
}

pub struct Pipeline<G> {
    config: PinfetchConfig,
    repo_root: PathBuf,
    resolver: RevisionResolver<G>,
    token: Option<AccessToken>,
    progress: Option<Sender<DownloadProgress>>,
}

impl Pipeline<GitCli> {
    /// Pipeline reading git metadata from the checkout at `repo_root`.
    pub fn for_repo(config: PinfetchConfig, repo_root: impl Into<PathBuf>) -> Self {
        let repo_root = repo_root.into();
        let resolver = RevisionResolver::new(
            GitCli::new(&repo_root),
            config.component.clone(),
            config.submodule_path.clone(),
        );
        Self::new(config, repo_root, resolver)
    }
}

impl<G: GitMetadata> Pipeline<G> {
    pub fn new(config: PinfetchConfig, repo_root: impl Into<PathBuf>, resolver: RevisionResolver<G>) -> Self {
        Self {
            config,
            repo_root: repo_root.into(),
            resolver,
            token: None,
            progress: None,
        }
    }

    /// Use this token instead of reading `config.token_env`.
    pub fn with_token(mut self, token: AccessToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_progress(mut self, tx: Sender<DownloadProgress>) -> Self {
        self.progress = Some(tx);
        self
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub async fn run(&self) -> Result<FetchReport, FetchError> {
        let cfg = &self.config;

        let revision = self.resolver.resolve().await?;
        revision.validate()?;

        let token = match &self.token {
            Some(t) => t.clone(),
            None => AccessToken::from_env(&cfg.token_env)?,
        };

        let http = HttpClient::new(ClientOptions::from_config(cfg));
        let ci = CiClient::new(http.clone(), &cfg.api_base_url, token.clone())?;

        let run = ci
            .find_run(&revision.owner, &revision.repo, &revision.commit_id)
            .await?;

        let pattern = revision.artifact_name(&cfg.artifact_prefix);
        let artifact = ci
            .find_artifact(&revision.owner, &revision.repo, run.id, &pattern)
            .await?;

        let download_path = cfg.download_path_in(&self.repo_root);
        let mut fetcher = Fetcher::new(http, token);
        if let Some(tx) = &self.progress {
            fetcher = fetcher.with_progress(tx.clone());
        }
        let bytes_written = fetcher
            .download(&artifact.download_url, &download_path)
            .await?;

        let archive_kind = sniff_file(&download_path).await?;
        tracing::info!(path = %download_path.display(), kind = %archive_kind, "sniffed download");

        let output_dir = cfg.output_dir_in(&self.repo_root);
        Extractor::new(&cfg.inner_archive)
            .extract(&download_path, archive_kind, &output_dir)
            .await?;

        Ok(FetchReport {
            revision,
            run_id: run.id,
            artifact_name: artifact.name,
            bytes_written,
            archive_kind,
            output_dir,
        })
    }
}
