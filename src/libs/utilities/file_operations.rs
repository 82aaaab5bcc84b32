use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io;
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use colored::Colorize;
use tempfile::TempDir;

use crate::errors::SetupError;
use crate::schemas::fonts::FontName;
use crate::{log_debug, log_warn};

/// Creates `path` and any missing parents with mode 0755.
/// An existing directory is fine; an existing non-directory is an error.
pub fn ensure_dir(path: &Path) -> Result<(), SetupError> {
    DirBuilder::new()
        .recursive(true)
        .mode(0o755)
        .create(path)
        .map_err(|source| SetupError::CreateDir {
            path: path.to_path_buf(),
            source,
        })?;

    if !path.is_dir() {
        return Err(SetupError::CreateDir {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "not a directory"),
        });
    }
    log_debug!("[Files] Directory ready: {}", path.display());
    Ok(())
}

/// Creates the private scratch directory for this run under `root`.
///
/// The directory is mode 0700 and is removed when the returned `TempDir` drops.
pub fn create_scratch_dir(root: &Path) -> Result<TempDir, SetupError> {
    ensure_dir(root)?;
    let dir = tempfile::Builder::new()
        .prefix("run-")
        .permissions(fs::Permissions::from_mode(0o700))
        .tempdir_in(root)
        .map_err(SetupError::Scratch)?;
    log_debug!("[Files] Scratch directory: {}", dir.path().display());
    Ok(dir)
}

/// Opens the scratch archive for `name` inside `scratch_dir`.
///
/// The path is derived only from the validated name. The file is created with
/// `O_CREAT | O_EXCL` and mode 0600, so an existing file or symlink at that path
/// is never followed or reused.
pub fn create_scratch_file(scratch_dir: &Path, name: &FontName) -> io::Result<(PathBuf, File)> {
    let path = scratch_dir.join(name.archive_file_name());
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(&path)?;
    Ok((path, file))
}

/// Deletes a scratch archive. A file that is already gone counts as removed.
pub fn remove_scratch_file(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log_debug!("[Files] Removed scratch file {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log_warn!(
            "[Files] Failed to remove scratch file '{}': {}",
            path.display().to_string().yellow(),
            e
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("a/b/fonts");
        ensure_dir(&target).unwrap();
        assert!(target.is_dir());
        // Second call on an existing directory is fine.
        ensure_dir(&target).unwrap();
    }

    #[test]
    fn ensure_dir_rejects_regular_file() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("fonts");
        fs::write(&target, b"x").unwrap();
        assert!(matches!(
            ensure_dir(&target),
            Err(SetupError::CreateDir { .. })
        ));
    }

    #[test]
    fn scratch_dir_is_private_and_removed_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let scratch = create_scratch_dir(&root.path().join("scratch")).unwrap();
        let path = scratch.path().to_path_buf();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o700);
        drop(scratch);
        assert!(!path.exists());
    }

    #[test]
    fn scratch_file_is_owner_only() {
        let dir = tempfile::tempdir().unwrap();
        let name = FontName::parse("Hack").unwrap();
        let (path, _file) = create_scratch_file(dir.path(), &name).unwrap();
        assert_eq!(path, dir.path().join("Hack.zip"));
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn scratch_file_refuses_existing_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let victim = dir.path().join("victim");
        fs::write(&victim, b"keep me").unwrap();
        std::os::unix::fs::symlink(&victim, dir.path().join("Hack.zip")).unwrap();

        let name = FontName::parse("Hack").unwrap();
        let err = create_scratch_file(dir.path(), &name).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&victim).unwrap(), b"keep me");
    }

    #[test]
    fn removing_missing_scratch_file_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.zip");
        remove_scratch_file(&path);
        fs::write(&path, b"zip").unwrap();
        remove_scratch_file(&path);
        assert!(!path.exists());
    }
}
