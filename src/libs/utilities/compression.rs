// Archive extraction backends for downloaded font archives.
//
// `UnzipCommand` runs the system `unzip` from an argument vector, matching what the
// dependency check installs. `BuiltinZip` unpacks in-process with the `zip` crate for
// hosts where spawning `unzip` is undesirable.

use std::fs::File;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use colored::Colorize;
use zip::ZipArchive;

use crate::libs::font_installer::ArchiveExtractor;
use crate::schemas::settings::ExtractorKind;
use crate::log_debug;

/// Builds the extractor selected in the settings.
pub fn extractor_for(kind: ExtractorKind) -> Box<dyn ArchiveExtractor> {
    match kind {
        ExtractorKind::Unzip => Box::new(UnzipCommand::default()),
        ExtractorKind::Builtin => Box::new(BuiltinZip),
    }
}

/// `unzip -o <archive> -d <dest>`, with output discarded.
#[derive(Debug, Clone)]
pub struct UnzipCommand {
    program: String,
}

impl Default for UnzipCommand {
    fn default() -> Self {
        UnzipCommand {
            program: "unzip".to_string(),
        }
    }
}

impl ArchiveExtractor for UnzipCommand {
    fn extract(&self, archive: &Path, dest: &Path) -> io::Result<()> {
        log_debug!(
            "[Extract] {} -o {} -d {}",
            self.program,
            archive.display().to_string().blue(),
            dest.display().to_string().cyan()
        );

        let status = Command::new(&self.program)
            .arg("-o")
            .arg(archive)
            .arg("-d")
            .arg(dest)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;

        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("{} exited with {}", self.program, status)))
        }
    }
}

/// In-process extraction. Entries whose names would escape `dest` are rejected by
/// the `zip` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinZip;

impl ArchiveExtractor for BuiltinZip {
    fn extract(&self, archive: &Path, dest: &Path) -> io::Result<()> {
        log_debug!(
            "[Extract] Unpacking {} into {}",
            archive.display().to_string().blue(),
            dest.display().to_string().cyan()
        );
        let file = File::open(archive)?;
        let mut zip = ZipArchive::new(file).map_err(io::Error::other)?;
        zip.extract(dest).map_err(io::Error::other)?;
        log_debug!("[Extract] {} entries extracted", zip.len());
        Ok(())
    }
}
