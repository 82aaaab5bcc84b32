// This file implements the installer's logging system.
// It provides macros for the different log levels (INFO, WARN, ERROR, DEBUG) plus a
// SUCCESS line for completed steps. Everything goes to stderr so the font menu and the
// summary table on stdout stay clean.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

// `log_info!` for general progress messages.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => (eprintln!("{} {}", colored::Colorize::bright_green("[INFO]"), format!($($arg)*)));
}

// `log_success!` for steps that completed, e.g. a font that was fully installed.
#[macro_export]
macro_rules! log_success {
    ($($arg:tt)*) => (eprintln!("{} {}", colored::Colorize::bright_green("✓"), format!($($arg)*)));
}

// `log_warn!` for recoverable problems: a skipped font, a failed cache refresh.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => (eprintln!("{} {}", colored::Colorize::bright_yellow("[WARN]"), format!($($arg)*)));
}

// `log_error!` for failures the user has to act on.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => (eprintln!("{} {}", colored::Colorize::bright_red("[ERROR]"), format!($($arg)*)));
}

// `log_debug!` is silent unless `--debug` was passed.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if $crate::logger::is_debug_enabled() {
           eprintln!("{} {}", colored::Colorize::dimmed("[DEBUG]"), format!($($arg)*));
        }
    };
}

// Global debug switch, initialized once from the command line.
static DEBUG_ENABLED: OnceLock<AtomicBool> = OnceLock::new();

/// Initializes the logger, setting the global debug mode.
/// Call once at startup, before anything logs.
///
/// # Arguments
/// * `debug`: If `true`, `log_debug!` lines are printed as well.
pub fn init(debug: bool) {
    DEBUG_ENABLED
        .get_or_init(|| AtomicBool::new(debug))
        .store(debug, Ordering::Relaxed);

    log_debug!("[Logger] Debug output enabled");
}

/// Checks if debug logging is currently enabled.
/// Returns `false` if `init` was never called.
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED
        .get()
        .map(|f| f.load(Ordering::Relaxed))
        .unwrap_or(false)
}
