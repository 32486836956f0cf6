//! `pinfetch extract` – sniff and unpack a local archive.

use anyhow::{bail, Result};
use pinfetch_core::archive::{self, Extractor};
use pinfetch_core::config::PinfetchConfig;
use std::path::Path;

pub async fn run_extract(cfg: &PinfetchConfig, path: &Path, dest: Option<&Path>) -> Result<()> {
    let dest = match dest {
        Some(d) => d.to_path_buf(),
        None => match path.parent() {
            Some(p) if p.as_os_str().is_empty() => Path::new(".").to_path_buf(),
            Some(p) => p.to_path_buf(),
            None => bail!("archive path has no parent directory; pass --dest"),
        },
    };

    let kind = archive::sniff_file(path).await?;
    tracing::info!(path = %path.display(), %kind, "extracting local archive");
    let outcome = Extractor::new(&cfg.inner_archive)
        .extract(path, kind, &dest)
        .await?;

    let stages: Vec<String> = outcome
        .stages
        .iter()
        .map(|s| s.to_string())
        .collect();
    println!("extracted {} into {} ({})", path.display(), dest.display(), stages.join(" -> "));
    Ok(())
}
