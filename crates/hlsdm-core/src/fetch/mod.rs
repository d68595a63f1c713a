//! Blocking HTTP GET client built on the curl crate (libcurl).
//!
//! One `Easy` handle per request. Bodies are streamed into a caller-supplied
//! writer so segments go straight to disk. Every request is bounded by a
//! connect timeout, a low-speed (stall) timeout and a hard total timeout.
//! Runs in the current thread; call from `spawn_blocking` in async code.

use std::io::Write;
use std::time::Duration;

use crate::config::HlsdmConfig;
use crate::retry::FetchError;

/// Below this many bytes/sec for `stall_timeout` the transfer is aborted.
const LOW_SPEED_LIMIT_BYTES: u32 = 1024;

/// Per-request limits and headers.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    /// Abort if throughput stays under 1 KiB/s this long.
    pub stall_timeout: Duration,
    /// Hard cap on a single request.
    pub request_timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            stall_timeout: Duration::from_secs(60),
            request_timeout: Duration::from_secs(600),
            user_agent: None,
        }
    }
}

impl FetchOptions {
    pub fn from_config(cfg: &HlsdmConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            stall_timeout: Duration::from_secs(cfg.stall_timeout_secs),
            request_timeout: Duration::from_secs(cfg.request_timeout_secs),
            user_agent: cfg.user_agent.clone(),
        }
    }
}

/// Cheap to clone; holds options only.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    opts: FetchOptions,
}

impl HttpClient {
    pub fn new(opts: FetchOptions) -> Self {
        Self { opts }
    }

    /// GETs `url` into memory. Used for manifests.
    pub fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();
        self.get_into(url, &mut body)?;
        Ok(body)
    }

    /// GETs `url`, streaming the body into `out`. Returns the number of bytes written.
    ///
    /// A write failure aborts the transfer and comes back as `FetchError::Storage`.
    /// A non-2xx status is `FetchError::Http` (whatever body arrived was still
    /// written, so callers must discard `out` on error).
    pub fn get_into<W: Write>(&self, url: &str, out: &mut W) -> Result<u64, FetchError> {
        let mut easy = self.easy_for(url).map_err(FetchError::Curl)?;
        let mut written = 0u64;
        let mut write_error: Option<std::io::Error> = None;

        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| match out.write_all(data) {
                    Ok(()) => {
                        written += data.len() as u64;
                        Ok(data.len())
                    }
                    Err(e) => {
                        write_error = Some(e);
                        Ok(0) // abort transfer
                    }
                })
                .map_err(FetchError::Curl)?;
            transfer.perform()
        };

        if let Err(e) = performed {
            if e.is_write_error() {
                if let Some(io_err) = write_error.take() {
                    return Err(FetchError::Storage(io_err));
                }
            }
            return Err(FetchError::Curl(e));
        }

        let code = easy.response_code().map_err(FetchError::Curl)?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }
        Ok(written)
    }

    fn easy_for(&self, url: &str) -> Result<curl::easy::Easy, curl::Error> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.opts.connect_timeout)?;
        easy.low_speed_limit(LOW_SPEED_LIMIT_BYTES)?;
        easy.low_speed_time(self.opts.stall_timeout)?;
        easy.timeout(self.opts.request_timeout)?;
        if let Some(ua) = &self.opts.user_agent {
            easy.useragent(ua)?;
        }
        Ok(easy)
    }
}
