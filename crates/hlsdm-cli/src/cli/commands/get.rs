//! `hlsdm get` – create and drive one job per playlist URL.

use anyhow::{Context, Result};
use hlsdm_core::config::{HlsdmConfig, RetryConfig};
use hlsdm_core::error::JobError;
use hlsdm_core::job_store::{JobSnapshot, JobStatus};
use hlsdm_core::orchestrator::{JobProgress, Orchestrator};
use hlsdm_core::retry::RetryPolicy;
use std::path::PathBuf;
use std::time::Instant;

const PROGRESS_INTERVAL_MS: u64 = 500;

#[derive(Debug, Default)]
pub struct GetOptions {
    pub download_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub retries: Option<u32>,
    pub json: bool,
}

pub async fn run_get(cfg: &HlsdmConfig, urls: Vec<String>, opts: GetOptions) -> Result<()> {
    let download_dir = match opts.download_dir {
        Some(dir) => dir,
        None => cfg
            .resolved_download_dir()
            .context("cannot determine download directory")?,
    };
    std::fs::create_dir_all(&download_dir)
        .with_context(|| format!("cannot create {}", download_dir.display()))?;
    let jobs = opts.jobs.unwrap_or(cfg.max_concurrent_jobs).max(1);
    let retry = opts
        .retries
        .map(|n| retry_policy_for(cfg, n))
        .unwrap_or_else(|| cfg.retry_policy());
    tracing::info!(
        urls = urls.len(),
        jobs,
        attempts = retry.max_attempts,
        dir = %download_dir.display(),
        "starting downloads"
    );

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::unbounded_channel::<JobProgress>();
    let quiet = opts.json;
    let progress_handle = tokio::spawn(async move {
        let mut last_print = Instant::now();
        while let Some(p) = progress_rx.recv().await {
            if quiet {
                continue;
            }
            let now = Instant::now();
            if now.duration_since(last_print).as_millis() as u64 >= PROGRESS_INTERVAL_MS
                || p.status.is_terminal()
                || p.downloaded_segments == 0
            {
                println!(
                    "  {}  {:<17} {}/{} segments ({:.0}%)",
                    p.id,
                    p.status,
                    p.downloaded_segments,
                    p.total_segments,
                    p.fraction() * 100.0
                );
                last_print = now;
            }
        }
    });

    let orch = Orchestrator::new(cfg, &download_dir)
        .with_retry(retry)
        .with_progress(progress_tx);
    let results = orch.download_all(urls.clone(), jobs).await;
    drop(orch);
    let _ = progress_handle.await;

    let failed = results
        .iter()
        .filter(|r| !matches!(r, Ok(job) if job.status == JobStatus::Downloaded))
        .count();

    if opts.json {
        print_json(&urls, &results)?;
    } else {
        print_table(&urls, &results);
    }

    if failed > 0 {
        anyhow::bail!("{} of {} download(s) failed", failed, results.len());
    }
    Ok(())
}

/// `--retries N`: N extra attempts, with the config's backoff if it has one.
pub(crate) fn retry_policy_for(cfg: &HlsdmConfig, retries: u32) -> RetryPolicy {
    if retries == 0 {
        return RetryPolicy::no_retry();
    }
    let base = cfg.retry.clone().unwrap_or_default();
    RetryConfig {
        max_attempts: retries.saturating_add(1),
        ..base
    }
    .to_policy()
}

fn print_table(urls: &[String], results: &[Result<JobSnapshot, JobError>]) {
    println!("{:<36} {:<17} {:<9} {}", "ID", "STATUS", "SEGMENTS", "URL");
    for (url, result) in urls.iter().zip(results) {
        match result {
            Ok(job) => {
                println!(
                    "{:<36} {:<17} {:<9} {}",
                    job.id,
                    job.status,
                    format!("{}/{}", job.downloaded_segments, job.total_segments),
                    job.source_url
                );
                if let Some(f) = &job.failure {
                    println!("  {:?}: {}", f.kind, f.message);
                } else {
                    println!("  -> {}", job.storage_location.display());
                }
            }
            Err(e) => {
                println!("{:<36} {:<17} {:<9} {}", "-", "NOT_CREATED", "-", url);
                println!("  {:?}: {}", e.kind(), e);
            }
        }
    }
}

fn print_json(urls: &[String], results: &[Result<JobSnapshot, JobError>]) -> Result<()> {
    let rows: Vec<serde_json::Value> = urls
        .iter()
        .zip(results)
        .map(|(url, result)| match result {
            Ok(job) => serde_json::to_value(job),
            Err(e) => Ok(serde_json::json!({
                "sourceUrl": url,
                "error": { "kind": e.kind(), "message": e.to_string() },
            })),
        })
        .collect::<Result<_, _>>()?;
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn zero_retries_disables_retry() {
        let cfg = HlsdmConfig::default();
        assert_eq!(retry_policy_for(&cfg, 0).max_attempts, 1);
    }

    #[test]
    fn retries_count_extra_attempts() {
        let cfg = HlsdmConfig::default();
        let p = retry_policy_for(&cfg, 2);
        assert_eq!(p.max_attempts, 3);
        assert_eq!(p.base_delay, Duration::from_millis(250));
    }

    #[test]
    fn retries_keep_configured_backoff() {
        let cfg = HlsdmConfig {
            retry: Some(RetryConfig {
                max_attempts: 9,
                base_delay_secs: 1.0,
                max_delay_secs: 4,
            }),
            ..HlsdmConfig::default()
        };
        let p = retry_policy_for(&cfg, 1);
        assert_eq!(p.max_attempts, 2);
        assert_eq!(p.base_delay, Duration::from_secs(1));
        assert_eq!(p.max_delay, Duration::from_secs(4));
    }
}
