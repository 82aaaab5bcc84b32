// =========================================================================== //
//                          STANDARD LIBRARY DEPENDENCIES                      //
// =========================================================================== //

use std::path::{Path, PathBuf};
use std::{env, fs, io};

// =========================================================================== //
//                             EXTERNAL DEPENDENCIES                           //
// =========================================================================== //

use colored::Colorize;

// =========================================================================== //
//                              INTERNAL IMPORTS                               //
// =========================================================================== //

use crate::errors::SetupError;
use crate::schemas::settings::InstallerSettings;
use crate::{log_debug, log_info};

/// Environment variable that points at an alternative `config.yaml`.
pub const CONFIG_ENV_VAR: &str = "NERDFONTS_CONFIG";

/// # PathResolver
///
/// Central path resolution for the installer.
///
/// It determines:
/// 1. The user's **home directory** (required; everything else hangs off it).
/// 2. The **configuration file** location.
/// 3. The **fonts directory** and **scratch root**, once settings are loaded.
///
/// Initialize once per run with `PathResolver::new()`.
#[derive(Debug, Clone)]
pub struct PathResolver {
    home: PathBuf,
    config_file: PathBuf,
}

/// Directories the installer writes to, fully expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPaths {
    /// Where font archives are extracted.
    pub fonts_dir: PathBuf,
    /// Parent of the per-run scratch directory.
    pub scratch_root: PathBuf,
}

impl PathResolver {
    /// Resolves the home directory and the configuration file path.
    ///
    /// Config file priority:
    /// 1. `config_override` (the `--config` flag).
    /// 2. `NERDFONTS_CONFIG` environment variable.
    /// 3. `~/.config/nerdfonts-installer/config.yaml`.
    pub fn new(config_override: Option<String>) -> Result<Self, SetupError> {
        let home = dirs::home_dir().ok_or(SetupError::HomeNotFound)?;
        log_debug!("[Config] Home directory: {}", home.display());

        let config_file =
            Self::resolve_config_file(&home, config_override, env::var(CONFIG_ENV_VAR).ok());
        log_debug!(
            "[Config] Configuration file: {}",
            config_file.display().to_string().cyan()
        );

        Ok(PathResolver { home, config_file })
    }

    fn resolve_config_file(
        home: &Path,
        user_override: Option<String>,
        env_value: Option<String>,
    ) -> PathBuf {
        if let Some(user_path) = user_override {
            Self::expand_with_home(home, &user_path)
        } else if let Some(env_path) = env_value.filter(|p| !p.trim().is_empty()) {
            log_debug!("[Config] Using {} for config file", CONFIG_ENV_VAR.cyan());
            Self::expand_with_home(home, &env_path)
        } else {
            home.join(".config")
                .join("nerdfonts-installer")
                .join("config.yaml")
        }
    }

    /// Loads `InstallerSettings` from the resolved configuration file.
    ///
    /// A missing file is not an error: defaults are returned. A file that exists but
    /// cannot be read or parsed is fatal, so a typo never silently falls back.
    pub fn load_settings(&self) -> Result<InstallerSettings, SetupError> {
        load_settings_from(&self.config_file)
    }

    /// Expands `~` in the configured directories.
    pub fn install_paths(&self, settings: &InstallerSettings) -> InstallPaths {
        let paths = InstallPaths {
            fonts_dir: Self::expand_with_home(&self.home, &settings.fonts_dir),
            scratch_root: Self::expand_with_home(&self.home, &settings.scratch_root),
        };
        log_debug!(
            "[Config] Fonts directory: {}, scratch root: {}",
            paths.fonts_dir.display(),
            paths.scratch_root.display()
        );
        paths
    }

    fn expand_with_home(home: &Path, raw: &str) -> PathBuf {
        let expanded = shellexpand::tilde_with_context(raw, || Some(home.to_string_lossy()));
        PathBuf::from(expanded.as_ref())
    }
}

fn load_settings_from(path: &Path) -> Result<InstallerSettings, SetupError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log_debug!(
                "[Config] No configuration file at {}, using defaults",
                path.display()
            );
            return Ok(InstallerSettings::default());
        }
        Err(e) => {
            return Err(SetupError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    // An empty file deserializes to `null`, which is not a mapping.
    if contents.trim().is_empty() {
        return Ok(InstallerSettings::default());
    }

    let settings: InstallerSettings =
        serde_yaml::from_str(&contents).map_err(|e| SetupError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if settings.max_fonts == 0 {
        return Err(SetupError::Config {
            path: path.to_path_buf(),
            reason: "max_fonts must be at least 1".to_string(),
        });
    }

    log_info!(
        "[Config] Loaded settings from {}",
        path.display().to_string().cyan()
    );
    Ok(settings)
}
