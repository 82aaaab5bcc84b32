// Our custom logging macros to give us nicely formatted output.
use crate::{log_debug, log_info};
// The 'colored' crate helps us make our console output look pretty and readable.
use colored::Colorize;
// For reading `/etc/os-release`.
use std::fs;
use std::path::Path;

use crate::errors::SetupError;

/// Where the distribution identifies itself.
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Package managers the installer knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Dnf,
    Yum,
    Pacman,
}

impl PackageManager {
    /// Maps a distribution ID (the `ID=` value in os-release) to its package manager.
    pub fn for_distro_id(id: &str) -> Option<Self> {
        match id {
            "ubuntu" | "debian" | "linuxmint" | "kali" | "deepin" | "devuan" | "mx" | "pop" => {
                Some(PackageManager::Apt)
            }
            "fedora" => Some(PackageManager::Dnf),
            "centos" | "rhel" => Some(PackageManager::Yum),
            "arch" | "manjaro" | "endeavouros" | "cachyos" | "garuda" | "artix" | "arco"
            | "steamos" | "blackarch" => Some(PackageManager::Pacman),
            _ => None,
        }
    }

    /// Commands to run, in order, once before any package is installed.
    pub fn refresh_command(&self) -> Option<Vec<String>> {
        match self {
            PackageManager::Apt => Some(to_argv(&["sudo", "apt-get", "update"])),
            _ => None,
        }
    }

    /// Argument vector that installs a single package non-interactively.
    pub fn install_command(&self, package: &str) -> Vec<String> {
        let mut argv = match self {
            PackageManager::Apt => to_argv(&["sudo", "apt-get", "install", "-y"]),
            PackageManager::Dnf => to_argv(&["sudo", "dnf", "install", "-y"]),
            PackageManager::Yum => to_argv(&["sudo", "yum", "install", "-y"]),
            PackageManager::Pacman => to_argv(&["sudo", "pacman", "-Syu", "--noconfirm"]),
        };
        argv.push(package.to_string());
        argv
    }
}

fn to_argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// The identifying fields of an os-release file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    pub id: String,
    pub id_like: Vec<String>,
}

impl OsRelease {
    /// Parses the `KEY=value` lines of an os-release document.
    /// Values may be wrapped in single or double quotes.
    pub fn parse(contents: &str) -> Self {
        let mut release = OsRelease::default();
        for line in contents.lines() {
            let line = line.trim();
            if let Some(value) = line.strip_prefix("ID=") {
                release.id = unquote(value).to_lowercase();
            } else if let Some(value) = line.strip_prefix("ID_LIKE=") {
                release.id_like = unquote(value)
                    .split_whitespace()
                    .map(str::to_lowercase)
                    .collect();
            }
        }
        release
    }

    /// Picks a package manager from `ID`, falling back to the `ID_LIKE` list.
    pub fn package_manager(&self) -> Option<PackageManager> {
        PackageManager::for_distro_id(&self.id).or_else(|| {
            self.id_like
                .iter()
                .find_map(|like| PackageManager::for_distro_id(like))
        })
    }
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}

/// Reads os-release and resolves the host's package manager.
pub fn detect_package_manager(os_release: &Path) -> Result<PackageManager, SetupError> {
    let contents = fs::read_to_string(os_release).map_err(SetupError::OsDetection)?;
    let release = OsRelease::parse(&contents);

    log_info!("[Deps] Detected OS: {}", release.id.bold());
    log_debug!("[Deps] ID_LIKE: {:?}", release.id_like);

    release
        .package_manager()
        .ok_or_else(|| SetupError::UnsupportedOs(release.id.clone()))
}
