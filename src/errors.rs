// Error types for every failure class the installer distinguishes.
//
// Setup and fetch errors are fatal and bubble up to `main`. Selection errors make the
// prompt ask again. Per-font problems are not errors at all: they are recorded as an
// `InstallOutcome` and the loop moves on. A failed cache refresh is only a warning.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Anything that stops the run before a single network request is made.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("could not read /etc/os-release: {0}")]
    OsDetection(#[source] io::Error),

    #[error("unsupported distribution '{0}'; please install curl, unzip and fontconfig manually")]
    UnsupportedOs(String),

    #[error("could not determine the home directory")]
    HomeNotFound,

    #[error("failed to install '{package}': {reason}")]
    DependencyInstall { package: String, reason: String },

    #[error("failed to create directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration file '{}': {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("failed to create scratch directory: {0}")]
    Scratch(#[source] io::Error),
}

/// Failures while building the font catalog. There is no retry.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch font list: {0}")]
    Network(String),

    #[error("unexpected font list format: {0}")]
    Format(String),

    #[error("no fonts found in the API response")]
    Empty,
}

/// Why a line of user input was not accepted as a selection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("please select at least one font or type \"all\"")]
    EmptyInput,

    // The offending token is intentionally left out of the message.
    #[error("invalid selection, please enter numbers between 1 and {max}")]
    InvalidToken { max: usize },
}

/// The font cache rebuild could not be completed.
#[derive(Debug, Error)]
pub enum CacheRefreshError {
    #[error("could not run fc-cache: {0}")]
    Spawn(#[source] io::Error),

    #[error("fc-cache exited with status {}", .0.map_or_else(|| "unknown".to_string(), |c| c.to_string()))]
    ExitStatus(Option<i32>),
}
