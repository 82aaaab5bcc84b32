use serde::{Deserialize, Serialize};

/// GitHub contents API listing of the `patched-fonts` directory.
pub const DEFAULT_API_URL: &str =
    "https://api.github.com/repos/ryanoasis/nerd-fonts/contents/patched-fonts?ref=master";
/// Release download prefix; `<FontName>.zip` is appended.
pub const DEFAULT_RELEASE_BASE_URL: &str =
    "https://github.com/ryanoasis/nerd-fonts/releases/latest/download";
/// Upper bound on catalog entries and on selection tokens.
pub const DEFAULT_MAX_FONTS: usize = 100;

/// How a downloaded archive is unpacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    /// `unzip -o <archive> -d <fonts_dir>`
    #[default]
    Unzip,
    /// In-process extraction with the `zip` crate.
    Builtin,
}

/// Schema for the optional `config.yaml`.
///
/// Every field has a default, so an empty or missing file is a valid configuration.
///
/// ```yaml
/// fonts_dir: ~/.local/share/fonts
/// extractor: builtin
/// use_pager: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerSettings {
    /// Endpoint returning a JSON array of objects with a `name` field.
    pub api_url: String,
    /// Base URL for release archives.
    pub release_base_url: String,
    /// Maximum number of fonts kept from the catalog.
    pub max_fonts: usize,
    /// Install target. `~` is expanded.
    pub fonts_dir: String,
    /// Parent directory of the per-run scratch directory. `~` is expanded.
    pub scratch_root: String,
    pub extractor: ExtractorKind,
    /// Page the font menu through `less` when stdout is a terminal.
    pub use_pager: bool,
    /// Run `fc-cache -f` after at least one successful install.
    pub refresh_cache: bool,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub download_timeout_secs: u64,
}

impl Default for InstallerSettings {
    fn default() -> Self {
        InstallerSettings {
            api_url: DEFAULT_API_URL.to_string(),
            release_base_url: DEFAULT_RELEASE_BASE_URL.to_string(),
            max_fonts: DEFAULT_MAX_FONTS,
            fonts_dir: "~/.local/share/fonts".to_string(),
            scratch_root: "~/.cache/nerdfonts-installer".to_string(),
            extractor: ExtractorKind::default(),
            use_pager: true,
            refresh_cache: true,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            download_timeout_secs: 300,
        }
    }
}
