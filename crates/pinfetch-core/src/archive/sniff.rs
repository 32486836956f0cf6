//! Content sniffing: classify a file by its leading magic bytes.
//!
//! Never looks at the file name or a declared content type; artifact
//! downloads are routinely misnamed (a zip saved as `.tar.gz`).

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::FetchError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ZIP_LOCAL_HEADER_MAGIC: [u8; 4] = [0x50, 0x4b, 0x03, 0x04];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    GzipTar,
    Zip,
    Unknown,
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArchiveKind::GzipTar => "gzip-tar",
            ArchiveKind::Zip => "zip",
            ArchiveKind::Unknown => "unknown",
        })
    }
}

/// Classify leading bytes. Fewer bytes than a magic simply do not match.
pub fn sniff_bytes(head: &[u8]) -> ArchiveKind {
    if head.starts_with(&GZIP_MAGIC) {
        ArchiveKind::GzipTar
    } else if head.starts_with(&ZIP_LOCAL_HEADER_MAGIC) {
        ArchiveKind::Zip
    } else {
        ArchiveKind::Unknown
    }
}

/// Read at most the first 4 bytes of `path` and classify them.
pub fn sniff_path(path: &Path) -> Result<ArchiveKind, FetchError> {
    let file = File::open(path).map_err(|e| FetchError::io(path, e))?;
    let mut head = Vec::with_capacity(ZIP_LOCAL_HEADER_MAGIC.len());
    file.take(ZIP_LOCAL_HEADER_MAGIC.len() as u64)
        .read_to_end(&mut head)
        .map_err(|e| FetchError::io(path, e))?;
    Ok(sniff_bytes(&head))
}

/// Async wrapper: sniffing happens off the runtime threads.
pub async fn sniff_file(path: &Path) -> Result<ArchiveKind, FetchError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || sniff_path(&path))
        .await
        .map_err(FetchError::task)?
}
