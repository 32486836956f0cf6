//! `pinfetch sniff` – classify a file by its magic bytes.

use anyhow::Result;
use pinfetch_core::archive;
use std::path::Path;

pub async fn run_sniff(path: &Path) -> Result<()> {
    let kind = archive::sniff_file(path).await?;
    println!("{}  {}", kind, path.display());
    Ok(())
}
