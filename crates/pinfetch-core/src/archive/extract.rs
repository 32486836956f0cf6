//! Extraction driven by the sniffed format.
//!
//! A CI artifact download is a zip wrapping the real payload, a gzip tarball
//! at a fixed relative path. Zip results are therefore re-sniffed at that
//! path and unpacked a second time when it holds a tarball.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::archiver::Archiver;
use super::sniff::{sniff_path, ArchiveKind};
use crate::error::FetchError;

/// Bytes of an unrecognized file shown in the error.
pub const PREVIEW_LEN: usize = 200;

/// Which unpack stages ran, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOutcome {
    pub stages: Vec<Archiver>,
}

#[derive(Debug, Clone)]
pub struct Extractor {
    inner_archive: PathBuf,
}

impl Extractor {
    /// `inner_archive` is the nested tarball path relative to the destination.
    pub fn new(inner_archive: impl Into<PathBuf>) -> Self {
        Self {
            inner_archive: inner_archive.into(),
        }
    }

    pub async fn extract(
        &self,
        path: &Path,
        kind: ArchiveKind,
        dest: &Path,
    ) -> Result<ExtractOutcome, FetchError> {
        let path = path.to_path_buf();
        let dest = dest.to_path_buf();
        let inner = self.inner_archive.clone();
        tokio::task::spawn_blocking(move || extract_blocking(&path, kind, &dest, &inner))
            .await
            .map_err(FetchError::task)?
    }
}

/// Blocking form of [`Extractor::extract`].
pub fn extract_blocking(
    path: &Path,
    kind: ArchiveKind,
    dest: &Path,
    inner_archive: &Path,
) -> Result<ExtractOutcome, FetchError> {
    let Some(archiver) = Archiver::for_kind(kind) else {
        return Err(FetchError::UnsupportedFormat {
            preview: preview(path),
        });
    };
    archiver.unpack(path, dest)?;
    let mut stages = vec![archiver];

    if archiver == Archiver::Zip {
        let inner = dest.join(inner_archive);
        if !inner.is_file() {
            tracing::warn!(inner = %inner.display(), "zip held no nested archive; leaving contents as-is");
        } else {
            match sniff_path(&inner).map_err(FetchError::extraction)? {
                ArchiveKind::GzipTar => {
                    Archiver::GzipTar.unpack(&inner, dest)?;
                    stages.push(Archiver::GzipTar);
                }
                other => {
                    tracing::warn!(inner = %inner.display(), kind = %other, "nested file is not a gzip tarball; skipping");
                }
            }
        }
    }

    tracing::info!(dest = %dest.display(), ?stages, "extraction complete");
    Ok(ExtractOutcome { stages })
}

/// First [`PREVIEW_LEN`] bytes as lossy UTF-8; never fails.
pub fn preview(path: &Path) -> String {
    let mut head = Vec::with_capacity(PREVIEW_LEN);
    let read = File::open(path).and_then(|f| f.take(PREVIEW_LEN as u64).read_to_end(&mut head));
    match read {
        Ok(_) => String::from_utf8_lossy(&head).into_owned(),
        Err(e) => format!("<unreadable: {e}>"),
    }
}
