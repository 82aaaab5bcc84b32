use std::fmt;

/// Longest font name accepted, in bytes (exclusive bound).
pub const MAX_FONT_NAME_LEN: usize = 50;

/// A font family name that is safe to embed in a file-system path and a URL.
///
/// Only `[A-Za-z0-9._-]` is allowed, the name may not start with `.` and may not
/// contain `..`. Construction is the only way to get one, so holding a `FontName`
/// means the check already passed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontName(String);

impl FontName {
    /// Validates `raw` and wraps it. Returns `None` for anything unsafe.
    pub fn parse(raw: &str) -> Option<Self> {
        if is_valid_font_name(raw) {
            Some(FontName(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the release archive for this font, e.g. `FiraCode.zip`.
    pub fn archive_file_name(&self) -> String {
        format!("{}.zip", self.as_str())
    }
}

impl fmt::Display for FontName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The naming rule behind `FontName::parse`.
pub fn is_valid_font_name(name: &str) -> bool {
    if name.is_empty() || name.len() >= MAX_FONT_NAME_LEN {
        return false;
    }
    if name.starts_with('.') || name.contains("..") {
        return false;
    }
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

/// Ordered list of installable font names from one fetch.
///
/// Names are unique and kept exactly as the remote source returned them; they are
/// validated only when a font is about to be installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontCatalog {
    names: Vec<String>,
}

impl FontCatalog {
    pub fn new(names: Vec<String>) -> Self {
        FontCatalog { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Looks up a zero-based index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }
}

/// Result of processing a single selected font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    NotFound,
    DownloadFailed,
    ExtractFailed,
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InstallOutcome::Installed => "installed",
            InstallOutcome::NotFound => "not found",
            InstallOutcome::DownloadFailed => "download failed",
            InstallOutcome::ExtractFailed => "extract failed",
        };
        f.write_str(label)
    }
}

/// Outcomes of one installer pass, in the order the fonts were processed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstallReport {
    entries: Vec<(String, InstallOutcome)>,
}

impl InstallReport {
    pub fn record(&mut self, name: &str, outcome: InstallOutcome) {
        self.entries.push((name.to_string(), outcome));
    }

    pub fn entries(&self) -> &[(String, InstallOutcome)] {
        &self.entries
    }

    pub fn installed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, outcome)| *outcome == InstallOutcome::Installed)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
