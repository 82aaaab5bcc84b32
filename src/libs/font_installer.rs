// The installer loop: for each selected font, validate the name, probe the release,
// download the archive to the scratch directory, extract it into the fonts directory
// and delete the archive.
//
// A failure for one font is recorded as its `InstallOutcome` and never stops the loop.
// Network and extraction are reached through the `ReleaseSource` and
// `ArchiveExtractor` traits so the loop itself is independent of HTTP and `unzip`.

use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;

use crate::libs::utilities::file_operations::{create_scratch_file, remove_scratch_file};
use crate::schemas::fonts::{FontName, InstallOutcome, InstallReport};
use crate::{log_debug, log_error, log_info, log_success, log_warn};

/// Why a release archive was judged not to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeError(pub String);

/// Where release archives come from.
pub trait ReleaseSource {
    /// Cheap existence check, no archive body transferred.
    fn probe(&self, name: &FontName) -> Result<(), ProbeError>;

    /// Streams the archive for `name` into `out`, returning the byte count.
    fn download(&self, name: &FontName, out: &mut dyn Write) -> io::Result<u64>;
}

/// Unpacks an archive into a directory.
pub trait ArchiveExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> io::Result<()>;
}

/// Everything the loop needs besides the list of names.
pub struct Installer<'a> {
    pub source: &'a dyn ReleaseSource,
    pub extractor: &'a dyn ArchiveExtractor,
    /// Private per-run directory that holds archives between download and extraction.
    pub scratch_dir: &'a Path,
    /// Extraction target.
    pub fonts_dir: &'a Path,
}

impl Installer<'_> {
    /// Processes `names` in order and returns the outcome of each.
    pub fn install_all<S: AsRef<str>>(&self, names: &[S]) -> InstallReport {
        let mut report = InstallReport::default();
        let total = names.len();

        for (position, raw) in names.iter().enumerate() {
            let raw = raw.as_ref();
            log_info!(
                "[Installer] ({}/{}) Downloading and installing {}",
                position + 1,
                total,
                raw.bold()
            );
            let outcome = self.install_one(raw);
            report.record(raw, outcome);
        }

        log_debug!(
            "[Installer] Finished: {} of {} installed",
            report.installed_count(),
            total
        );
        report
    }

    fn install_one(&self, raw: &str) -> InstallOutcome {
        let Some(name) = FontName::parse(raw) else {
            log_error!("[Installer] Invalid font name received from catalog, skipping");
            return InstallOutcome::NotFound;
        };

        if let Err(ProbeError(reason)) = self.source.probe(&name) {
            log_warn!(
                "[Installer] {} not found in releases ({}), skipping...",
                name.to_string().yellow(),
                reason
            );
            return InstallOutcome::NotFound;
        }

        let (archive_path, mut file) = match create_scratch_file(self.scratch_dir, &name) {
            Ok(created) => created,
            Err(e) => {
                log_error!(
                    "[Installer] Failed to create scratch file for {}: {}",
                    name.to_string().red(),
                    e
                );
                return InstallOutcome::DownloadFailed;
            }
        };

        let downloaded = self.source.download(&name, &mut file);
        // Close the handle before anything else touches the archive.
        drop(file);

        if let Err(e) = downloaded {
            log_error!(
                "[Installer] Failed to download {}: {}",
                name.to_string().red(),
                e
            );
            remove_scratch_file(&archive_path);
            return InstallOutcome::DownloadFailed;
        }

        let extracted = self.extractor.extract(&archive_path, self.fonts_dir);
        remove_scratch_file(&archive_path);

        match extracted {
            Ok(()) => {
                log_success!("{} installed successfully", name.to_string().green());
                InstallOutcome::Installed
            }
            Err(e) => {
                log_error!(
                    "[Installer] Failed to extract {}: {}",
                    name.to_string().red(),
                    e
                );
                InstallOutcome::ExtractFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::fs;

    /// Serves archives for a fixed set of names; records every call.
    #[derive(Default)]
    struct FakeSource {
        available: HashSet<String>,
        broken_downloads: HashSet<String>,
        probed: RefCell<Vec<String>>,
        downloaded: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn with(available: &[&str]) -> Self {
            FakeSource {
                available: available.iter().map(|s| s.to_string()).collect(),
                ..FakeSource::default()
            }
        }
    }

    impl ReleaseSource for FakeSource {
        fn probe(&self, name: &FontName) -> Result<(), ProbeError> {
            self.probed.borrow_mut().push(name.to_string());
            if self.available.contains(name.as_str()) {
                Ok(())
            } else {
                Err(ProbeError("HTTP 404 Not Found".to_string()))
            }
        }

        fn download(&self, name: &FontName, out: &mut dyn Write) -> io::Result<u64> {
            self.downloaded.borrow_mut().push(name.to_string());
            if self.broken_downloads.contains(name.as_str()) {
                return Err(io::Error::other("connection reset"));
            }
            let body = format!("archive:{name}");
            out.write_all(body.as_bytes())?;
            Ok(body.len() as u64)
        }
    }

    /// "Extracts" by copying the archive contents to `<dest>/<stem>.ttf`.
    #[derive(Default)]
    struct FakeExtractor {
        failing: HashSet<String>,
        seen: RefCell<Vec<String>>,
    }

    impl ArchiveExtractor for FakeExtractor {
        fn extract(&self, archive: &Path, dest: &Path) -> io::Result<()> {
            let stem = archive.file_stem().unwrap().to_string_lossy().to_string();
            assert!(archive.is_file(), "archive must exist while extracting");
            self.seen.borrow_mut().push(stem.clone());
            if self.failing.contains(&stem) {
                return Err(io::Error::other("unzip exited with 9"));
            }
            fs::copy(archive, dest.join(format!("{stem}.ttf")))?;
            Ok(())
        }
    }

    struct Dirs {
        _root: tempfile::TempDir,
        scratch: std::path::PathBuf,
        fonts: std::path::PathBuf,
    }

    fn dirs() -> Dirs {
        let root = tempfile::tempdir().unwrap();
        let scratch = root.path().join("scratch");
        let fonts = root.path().join("fonts");
        fs::create_dir(&scratch).unwrap();
        fs::create_dir(&fonts).unwrap();
        Dirs {
            _root: root,
            scratch,
            fonts,
        }
    }

    fn scratch_is_empty(dirs: &Dirs) -> bool {
        fs::read_dir(&dirs.scratch).unwrap().next().is_none()
    }

    #[test]
    fn installs_every_available_font() {
        let dirs = dirs();
        let source = FakeSource::with(&["Go-Mono", "Hack"]);
        let extractor = FakeExtractor::default();
        let installer = Installer {
            source: &source,
            extractor: &extractor,
            scratch_dir: &dirs.scratch,
            fonts_dir: &dirs.fonts,
        };

        let report = installer.install_all(&["Go-Mono", "Hack"]);

        assert_eq!(report.installed_count(), 2);
        assert_eq!(
            fs::read_to_string(dirs.fonts.join("Hack.ttf")).unwrap(),
            "archive:Hack"
        );
        assert!(scratch_is_empty(&dirs));
    }

    #[test]
    fn missing_release_does_not_stop_the_loop() {
        let dirs = dirs();
        let source = FakeSource::with(&["Hack"]);
        let extractor = FakeExtractor::default();
        let installer = Installer {
            source: &source,
            extractor: &extractor,
            scratch_dir: &dirs.scratch,
            fonts_dir: &dirs.fonts,
        };

        let report = installer.install_all(&["Missing", "Hack"]);

        assert_eq!(report.installed_count(), 1);
        assert_eq!(
            report.entries(),
            &[
                ("Missing".to_string(), InstallOutcome::NotFound),
                ("Hack".to_string(), InstallOutcome::Installed),
            ]
        );
        // The missing font was never downloaded.
        assert_eq!(*source.downloaded.borrow(), vec!["Hack".to_string()]);
    }

    #[test]
    fn visits_all_fonts_and_counts_only_successes() {
        let dirs = dirs();
        let mut source = FakeSource::with(&["A", "B", "C", "D"]);
        source.broken_downloads.insert("B".to_string());
        let extractor = FakeExtractor {
            failing: ["C".to_string()].into_iter().collect(),
            ..FakeExtractor::default()
        };
        let installer = Installer {
            source: &source,
            extractor: &extractor,
            scratch_dir: &dirs.scratch,
            fonts_dir: &dirs.fonts,
        };

        let report = installer.install_all(&["A", "B", "C", "D", "E"]);

        let outcomes: Vec<InstallOutcome> = report.entries().iter().map(|(_, o)| *o).collect();
        assert_eq!(
            outcomes,
            vec![
                InstallOutcome::Installed,
                InstallOutcome::DownloadFailed,
                InstallOutcome::ExtractFailed,
                InstallOutcome::Installed,
                InstallOutcome::NotFound,
            ]
        );
        assert_eq!(report.installed_count(), 2);
        assert_eq!(source.probed.borrow().len(), 5);
        assert!(scratch_is_empty(&dirs));
    }

    #[test]
    fn invalid_names_are_not_probed() {
        let dirs = dirs();
        let source = FakeSource::with(&["../etc"]);
        let extractor = FakeExtractor::default();
        let installer = Installer {
            source: &source,
            extractor: &extractor,
            scratch_dir: &dirs.scratch,
            fonts_dir: &dirs.fonts,
        };

        let report = installer.install_all(&["../etc", ".hidden", "bad name"]);

        assert_eq!(report.installed_count(), 0);
        assert!(report
            .entries()
            .iter()
            .all(|(_, o)| *o == InstallOutcome::NotFound));
        assert!(source.probed.borrow().is_empty());
    }

    #[test]
    fn pre_existing_scratch_path_fails_download_without_touching_it() {
        let dirs = dirs();
        let planted = dirs.scratch.join("Hack.zip");
        fs::write(&planted, b"planted").unwrap();

        let source = FakeSource::with(&["Hack"]);
        let extractor = FakeExtractor::default();
        let installer = Installer {
            source: &source,
            extractor: &extractor,
            scratch_dir: &dirs.scratch,
            fonts_dir: &dirs.fonts,
        };

        let report = installer.install_all(&["Hack"]);

        assert_eq!(report.entries()[0].1, InstallOutcome::DownloadFailed);
        assert!(source.downloaded.borrow().is_empty());
        assert_eq!(fs::read(&planted).unwrap(), b"planted");
    }

    #[test]
    fn duplicate_names_are_processed_each_time() {
        let dirs = dirs();
        let source = FakeSource::with(&["Hack"]);
        let extractor = FakeExtractor::default();
        let installer = Installer {
            source: &source,
            extractor: &extractor,
            scratch_dir: &dirs.scratch,
            fonts_dir: &dirs.fonts,
        };

        let report = installer.install_all(&["Hack", "Hack"]);

        assert_eq!(report.installed_count(), 2);
        assert_eq!(extractor.seen.borrow().len(), 2);
    }
}
