//! `pinfetch resolve` – show which build `fetch` would download.

use anyhow::Result;
use pinfetch_core::config::PinfetchConfig;
use pinfetch_core::revision::{GitCli, RevisionResolver};
use std::path::Path;

pub async fn run_resolve(cfg: &PinfetchConfig, repo_root: &Path) -> Result<()> {
    let resolver = RevisionResolver::new(
        GitCli::new(repo_root),
        cfg.component.clone(),
        cfg.submodule_path.clone(),
    );
    let info = resolver.resolve().await?;
    info.validate()?;

    println!("repository: {}/{}", info.owner, info.repo);
    println!("commit:     {}", info.commit_id);
    println!("platform:   {}", info.platform);
    println!("artifact:   {}", info.artifact_name(&cfg.artifact_prefix));
    Ok(())
}
