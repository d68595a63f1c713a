//! `hlsdm config` – show where the config lives and what is in effect.

use anyhow::Result;
use hlsdm_core::config::{self, HlsdmConfig};

pub fn run_config(cfg: &HlsdmConfig) -> Result<()> {
    println!("config file:          {}", config::config_path()?.display());
    println!("download_dir:         {}", cfg.resolved_download_dir()?.display());
    println!("max_concurrent_jobs:  {}", cfg.max_concurrent_jobs);
    println!("connect_timeout_secs: {}", cfg.connect_timeout_secs);
    println!("stall_timeout_secs:   {}", cfg.stall_timeout_secs);
    println!("request_timeout_secs: {}", cfg.request_timeout_secs);
    println!(
        "user_agent:           {}",
        cfg.user_agent.as_deref().unwrap_or("(curl default)")
    );
    match &cfg.retry {
        Some(r) => println!(
            "retry:                {} attempts, backoff {}s..{}s",
            r.max_attempts, r.base_delay_secs, r.max_delay_secs
        ),
        None => println!("retry:                off"),
    }
    if let Ok(path) = hlsdm_core::logging::log_file_path() {
        println!("log file:             {}", path.display());
    }
    Ok(())
}
