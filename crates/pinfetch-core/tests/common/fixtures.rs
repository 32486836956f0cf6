//! Canned git metadata, API payloads and archives.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use pinfetch_core::config::PinfetchConfig;
use pinfetch_core::revision::{GitMetadata, Platform, RevisionResolver};
use pinfetch_core::FetchError;

pub const SHA: &str = "0123456789abcdef0123456789abcdef01234567";

pub struct FakeGit {
    pub url: String,
    pub status: String,
}

impl GitMetadata for FakeGit {
    async fn submodule_url(&self, _name: &str) -> Result<String, FetchError> {
        Ok(self.url.clone())
    }

    async fn submodule_status(&self, _path: &str) -> Result<String, FetchError> {
        Ok(self.status.clone())
    }
}

/// Resolver for `acme/mail` pinned at [`SHA`] on linux-x86_64.
pub fn acme_resolver() -> RevisionResolver<FakeGit> {
    RevisionResolver::new(
        FakeGit {
            url: "git@github.com:acme/mail.git".to_string(),
            status: format!(" {} mailsync (heads/main)\n", SHA),
        },
        "mailsync",
        "mailsync",
    )
    .with_platform(Platform::new("linux", "x86_64"))
}

/// Config pointing at a local server, with artifacts named `mail-<sha>-<tag>`.
pub fn config_for(api_base: &str) -> PinfetchConfig {
    PinfetchConfig {
        api_base_url: api_base.to_string(),
        artifact_prefix: "mail".to_string(),
        token_env: "PINFETCH_TEST_TOKEN_UNSET".to_string(),
        timeout_secs: Some(10),
        ..PinfetchConfig::default()
    }
}

pub fn run_json(id: u64, head_sha: &str) -> String {
    format!(r#"{{"id":{},"head_sha":"{}","status":"completed"}}"#, id, head_sha)
}

pub fn runs_page(runs: &[String]) -> String {
    format!(
        r#"{{"total_count":{},"workflow_runs":[{}]}}"#,
        runs.len(),
        runs.join(",")
    )
}

/// A full page of runs that do not match anything.
pub fn filler_page(start_id: u64) -> String {
    let runs: Vec<String> = (0..100)
        .map(|i| run_json(start_id + i, &format!("{:040x}", start_id + i)))
        .collect();
    runs_page(&runs)
}

pub fn artifacts_page(artifacts: &[(&str, &str)]) -> String {
    let items: Vec<String> = artifacts
        .iter()
        .map(|(name, url)| {
            format!(
                r#"{{"id":1,"name":"{}","size_in_bytes":10,"archive_download_url":"{}"}}"#,
                name, url
            )
        })
        .collect();
    format!(
        r#"{{"total_count":{},"artifacts":[{}]}}"#,
        items.len(),
        items.join(",")
    )
}

pub fn tar_gz_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        builder.append_data(&mut header, path, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn read(path: &Path) -> Vec<u8> {
    std::fs::read(path).unwrap_or_else(|e| panic!("read {}: {}", path.display(), e))
}
