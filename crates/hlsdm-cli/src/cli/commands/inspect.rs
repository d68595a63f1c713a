//! `hlsdm inspect` – fetch and parse a manifest, list its segments.

use anyhow::{Context, Result};
use hlsdm_core::config::HlsdmConfig;
use hlsdm_core::fetch::{FetchOptions, HttpClient};
use hlsdm_core::locator::resolve_segment_url;
use hlsdm_core::playlist::parse_playlist_bytes;

pub async fn run_inspect(cfg: &HlsdmConfig, url: &str) -> Result<()> {
    let client = HttpClient::new(FetchOptions::from_config(cfg));
    let target = url.to_string();
    let body = tokio::task::spawn_blocking(move || client.get_bytes(&target))
        .await
        .context("manifest fetch task join")?
        .with_context(|| format!("cannot fetch {}", url))?;
    let playlist = parse_playlist_bytes(&body).with_context(|| format!("cannot parse {}", url))?;

    let version = playlist
        .version
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!("url:       {}", url);
    println!("version:   {}", version);
    println!("complete:  {}", if playlist.complete { "yes" } else { "no (live?)" });
    println!("segments:  {}", playlist.len());
    println!("duration:  {:.1}s", playlist.total_duration());
    if let Some(t) = playlist.target_duration {
        println!("target:    {}s", t);
    }
    if playlist.is_empty() {
        return Ok(());
    }

    println!();
    println!("{:<6} {:>8}  {:<30} {}", "INDEX", "DURATION", "REFERENCE", "RESOLVED");
    for (i, entry) in playlist.entries.iter().enumerate() {
        let resolved = resolve_segment_url(&entry.reference, url)?;
        println!(
            "{:<6} {:>8.3}  {:<30} {}",
            i, entry.duration, entry.reference, resolved
        );
    }
    Ok(())
}
