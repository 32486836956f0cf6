//! `pinfetch fetch` – run the whole pipeline with a progress line.

use anyhow::Result;
use pinfetch_core::config::PinfetchConfig;
use pinfetch_core::fetch::DownloadProgress;
use pinfetch_core::Pipeline;
use std::path::Path;
use std::time::Instant;

const PROGRESS_INTERVAL_MS: u64 = 500;

pub async fn run_fetch(cfg: PinfetchConfig, repo_root: &Path) -> Result<()> {
    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<DownloadProgress>(16);
    let progress_handle = tokio::spawn(async move {
        let mut last_print: Option<Instant> = None;
        while let Some(p) = progress_rx.recv().await {
            let now = Instant::now();
            let due = last_print
                .map(|t| now.duration_since(t).as_millis() as u64 >= PROGRESS_INTERVAL_MS)
                .unwrap_or(true);
            if due || p.is_complete() {
                println!("  {}", format_progress(&p));
                last_print = Some(now);
            }
        }
    });

    let pipeline = Pipeline::for_repo(cfg, repo_root).with_progress(progress_tx);
    let result = pipeline.run().await;
    // Close the channel so the printer drains and exits.
    drop(pipeline);
    let _ = progress_handle.await;

    let report = result?;
    println!(
        "fetched {} (run {}, {} bytes, {}) into {}",
        report.artifact_name,
        report.run_id,
        report.bytes_written,
        report.archive_kind,
        report.output_dir.display()
    );
    Ok(())
}

fn format_progress(p: &DownloadProgress) -> String {
    let done_mib = p.bytes_transferred as f64 / 1_048_576.0;
    match (p.bytes_total, p.percent()) {
        (Some(total), Some(pct)) => format!(
            "{:.1} / {:.1} MiB ({}%)",
            done_mib,
            total as f64 / 1_048_576.0,
            pct
        ),
        _ => format!("{:.1} MiB", done_mib),
    }
}
