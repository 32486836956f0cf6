//! The two unpackers, selected by sniffed [`ArchiveKind`].

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;

use super::sniff::ArchiveKind;
use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archiver {
    Zip,
    GzipTar,
}

impl Archiver {
    /// None for [`ArchiveKind::Unknown`].
    pub fn for_kind(kind: ArchiveKind) -> Option<Self> {
        match kind {
            ArchiveKind::Zip => Some(Archiver::Zip),
            ArchiveKind::GzipTar => Some(Archiver::GzipTar),
            ArchiveKind::Unknown => None,
        }
    }

    /// Unpack `src` into `dest`, overlaying what is already there.
    /// Blocking; call from `spawn_blocking` when used from async code.
    pub fn unpack(self, src: &Path, dest: &Path) -> Result<(), FetchError> {
        tracing::debug!(archiver = ?self, src = %src.display(), dest = %dest.display(), "unpacking");
        self.unpack_inner(src, dest).map_err(|e| {
            FetchError::extraction(format!("{} {} into {}: {}", self, src.display(), dest.display(), e))
        })
    }

    fn unpack_inner(self, src: &Path, dest: &Path) -> io::Result<()> {
        fs::create_dir_all(dest)?;
        let file = File::open(src)?;
        match self {
            Archiver::Zip => unpack_zip(file, dest),
            Archiver::GzipTar => unpack_gzip_tar(file, dest),
        }
    }
}

impl fmt::Display for Archiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Archiver::Zip => "zip",
            Archiver::GzipTar => "gzip-tar",
        })
    }
}

fn unpack_gzip_tar(file: File, dest: &Path) -> io::Result<()> {
    let mut archive = Archive::new(GzDecoder::new(BufReader::new(file)));
    archive.set_overwrite(true);
    archive.unpack(dest)
}

/// Mode for regular files whose entry carries none.
#[cfg_attr(not(unix), allow(dead_code))]
const DEFAULT_FILE_MODE: u32 = 0o644;

#[cfg(unix)]
const S_IFMT: u32 = 0o170000;
#[cfg(unix)]
const S_IFLNK: u32 = 0o120000;

/// Each entry goes to a temp file next to its target and is renamed into
/// place. The artifact zip usually holds a file with the same path as the zip
/// itself, and the open archive must keep reading the original inode.
fn unpack_zip(file: File, dest: &Path) -> io::Result<()> {
    let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(io::Error::other)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(io::Error::other)?;
        let Some(rel) = entry.enclosed_name() else {
            tracing::warn!(name = %entry.name(), "skipping zip entry with unsafe path");
            continue;
        };
        let out = dest.join(&rel);

        if entry.is_dir() {
            fs::create_dir_all(&out)?;
            continue;
        }
        let parent = out.parent().unwrap_or(dest);
        fs::create_dir_all(parent)?;

        #[cfg(unix)]
        if entry.unix_mode().is_some_and(|m| m & S_IFMT == S_IFLNK) {
            let mut target = String::new();
            io::Read::read_to_string(&mut entry, &mut target)?;
            unpack_symlink(&rel, &out, &target)?;
            continue;
        }

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        io::copy(&mut entry, &mut tmp)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = file_mode(entry.unix_mode());
            fs::set_permissions(tmp.path(), fs::Permissions::from_mode(mode))?;
        }

        tmp.persist(&out).map_err(|e| e.error)?;
    }
    Ok(())
}

/// Permission bits for a regular file entry.
#[cfg_attr(not(unix), allow(dead_code))]
fn file_mode(unix_mode: Option<u32>) -> u32 {
    unix_mode.map(|m| m & 0o7777).unwrap_or(DEFAULT_FILE_MODE)
}

/// Replace whatever is at `out` with a symlink to `target`. Links that would
/// point outside the extraction root are skipped.
#[cfg(unix)]
fn unpack_symlink(rel: &Path, out: &Path, target: &str) -> io::Result<()> {
    let link_dir = rel.parent().unwrap_or(Path::new(""));
    if !link_stays_inside(link_dir, Path::new(target)) {
        tracing::warn!(link = %rel.display(), %target, "skipping symlink leaving the extraction root");
        return Ok(());
    }
    match fs::symlink_metadata(out) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(out)?,
        Ok(_) => fs::remove_file(out)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    std::os::unix::fs::symlink(target, out)
}

/// Lexically resolve `target` from `link_dir` (both relative to the root) and
/// check it never climbs above the root.
#[cfg(unix)]
fn link_stays_inside(link_dir: &Path, target: &Path) -> bool {
    use std::path::Component;

    let mut depth: usize = 0;
    for c in link_dir.components().chain(target.components()) {
        match c {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}
