use std::process::{Command, Stdio};

use crate::errors::CacheRefreshError;
use crate::{log_debug, log_success, log_warn};

/// Rebuilds the fontconfig cache with `fc-cache -f`.
pub fn refresh_font_cache() -> Result<(), CacheRefreshError> {
    run_cache_tool("fc-cache")
}

fn run_cache_tool(program: &str) -> Result<(), CacheRefreshError> {
    log_debug!("[Cache] Running {} -f", program);
    let status = Command::new(program)
        .arg("-f")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(CacheRefreshError::Spawn)?;

    if status.success() {
        Ok(())
    } else {
        Err(CacheRefreshError::ExitStatus(status.code()))
    }
}

/// What happened to the font cache at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheRefresh {
    Skipped,
    Refreshed,
    Failed,
}

/// Refreshes the cache when at least one font was installed.
///
/// A failure is only a warning: the fonts are on disk and applications will
/// pick them up on the next cache rebuild.
pub fn refresh_if_installed(installed_count: usize, enabled: bool) -> CacheRefresh {
    refresh_with(installed_count, enabled, refresh_font_cache)
}

fn refresh_with<F>(installed_count: usize, enabled: bool, refresh: F) -> CacheRefresh
where
    F: FnOnce() -> Result<(), CacheRefreshError>,
{
    if installed_count == 0 {
        log_debug!("[Cache] Nothing installed, skipping cache refresh");
        return CacheRefresh::Skipped;
    }
    if !enabled {
        log_debug!("[Cache] Cache refresh disabled in settings");
        return CacheRefresh::Skipped;
    }

    match refresh() {
        Ok(()) => {
            log_success!("Font installation complete!");
            CacheRefresh::Refreshed
        }
        Err(e) => {
            log_warn!(
                "[Cache] Font cache update failed, but fonts were installed: {}",
                e
            );
            CacheRefresh::Failed
        }
    }
}
