// Ensures the external programs the installer relies on are present, installing the
// missing ones through the distribution's package manager.
//
// Every command is spawned from an argument vector; nothing here goes through a shell.

use std::path::Path;
use std::process::Command;

use colored::Colorize;
use console::Term;

use crate::errors::SetupError;
use crate::libs::utilities::platform::{PackageManager, detect_package_manager};
use crate::{log_debug, log_info, log_success, log_warn};

/// A program that must be on PATH, and the package that provides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    pub binary: &'static str,
    pub package: &'static str,
}

/// `curl` and `unzip` for fetching and unpacking, `fc-cache` from fontconfig for the cache.
pub const REQUIRED_DEPENDENCIES: [Dependency; 3] = [
    Dependency {
        binary: "curl",
        package: "curl",
    },
    Dependency {
        binary: "unzip",
        package: "unzip",
    },
    Dependency {
        binary: "fc-cache",
        package: "fontconfig",
    },
];

/// Returns `true` if `binary` resolves to an executable on PATH.
pub fn command_exists(binary: &str) -> bool {
    which::which(binary).is_ok()
}

/// Filters `deps` down to the ones whose binary is missing, according to `exists`.
pub fn missing_dependencies<F>(deps: &[Dependency], exists: F) -> Vec<Dependency>
where
    F: Fn(&str) -> bool,
{
    deps.iter().copied().filter(|d| !exists(d.binary)).collect()
}

/// Detects the distribution and installs whatever is missing.
///
/// The distribution is detected first, as an unsupported host is fatal even when
/// all tools happen to be present.
///
/// # Arguments
/// * `os_release`: Path to the os-release file (normally `/etc/os-release`).
/// * `assume_yes`: Skip the confirmation prompt before running `sudo`.
pub fn ensure_dependencies(os_release: &Path, assume_yes: bool) -> Result<(), SetupError> {
    let manager = detect_package_manager(os_release)?;
    log_debug!("[Deps] Using package manager {:?}", manager);

    let missing = missing_dependencies(&REQUIRED_DEPENDENCIES, command_exists);
    if missing.is_empty() {
        log_success!("All dependencies are installed");
        return Ok(());
    }

    let packages: Vec<&str> = missing.iter().map(|d| d.package).collect();
    log_warn!(
        "[Deps] Missing dependencies: {}",
        packages.join(", ").yellow()
    );

    if !assume_yes && !confirm_install(&packages)? {
        return Err(SetupError::DependencyInstall {
            package: packages.join(", "),
            reason: "installation declined".to_string(),
        });
    }

    if let Some(refresh) = manager.refresh_command() {
        // A failed index refresh is not fatal by itself; the install step decides.
        if let Err(reason) = run_argv(&refresh) {
            log_warn!("[Deps] Package index refresh failed: {}", reason);
        }
    }

    for dep in &missing {
        install_package(manager, dep.package)?;
    }

    log_success!("All dependencies are installed");
    Ok(())
}

fn confirm_install(packages: &[&str]) -> Result<bool, SetupError> {
    // Without a terminal there is nobody to ask.
    if !Term::stderr().is_term() {
        return Ok(true);
    }

    dialoguer::Confirm::new()
        .with_prompt(format!(
            "Install {} using sudo?",
            packages.join(", ")
        ))
        .default(true)
        .interact()
        .map_err(|e| SetupError::DependencyInstall {
            package: packages.join(", "),
            reason: e.to_string(),
        })
}

fn install_package(manager: PackageManager, package: &str) -> Result<(), SetupError> {
    log_info!(
        "[Deps] {} not found. Installing {}...",
        package.yellow(),
        package
    );
    run_argv(&manager.install_command(package)).map_err(|reason| SetupError::DependencyInstall {
        package: package.to_string(),
        reason,
    })
}

/// Runs an argument vector with inherited stdio (sudo may need the terminal).
fn run_argv(argv: &[String]) -> Result<(), String> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| "empty command".to_string())?;
    log_debug!("[Deps] Running: {}", argv.join(" ").cyan());

    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| format!("could not run '{program}': {e}"))?;

    if status.success() {
        Ok(())
    } else {
        Err(format!("'{}' exited with {}", argv.join(" "), status))
    }
}
