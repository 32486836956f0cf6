//! Format sniffing and extraction of downloaded artifacts.

mod archiver;
mod extract;
mod sniff;

#[cfg(test)]
pub(crate) mod test_support;

pub use archiver::Archiver;
pub use extract::{extract_blocking, preview, ExtractOutcome, Extractor, PREVIEW_LEN};
pub use sniff::{sniff_bytes, sniff_file, sniff_path, ArchiveKind};
