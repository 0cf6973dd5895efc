//! Atomic replacement of env files on disk

use crate::{EnvFile, EnvFileError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

impl EnvFile {
    /// Write the rendered file to `path`, replacing any existing file.
    ///
    /// The content goes to a temporary file in the same directory, is synced,
    /// and is then renamed over `path`. If `path` is a symlink, the file it
    /// points to is replaced and the link stays. An existing file's
    /// permissions carry over. On any error the temporary file is removed and
    /// `path` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`EnvFileError::Io`] naming the step that failed.
    pub fn write_atomic(&self, path: &Path) -> Result<()> {
        let target = resolve_target(path);
        let path = target.as_path();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let prefix = path
            .file_name()
            .map_or_else(|| ".env".into(), |name| name.to_string_lossy());

        let mut temp = tempfile::Builder::new()
            .prefix(&format!(".{prefix}."))
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| EnvFileError::io(e, dir, "create temporary file"))?;

        if let Ok(metadata) = std::fs::metadata(path) {
            temp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| EnvFileError::io(e, temp.path(), "set permissions"))?;
        }

        temp.write_all(self.render().as_bytes())
            .map_err(|e| EnvFileError::io(e, temp.path(), "write"))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| EnvFileError::io(e, temp.path(), "sync"))?;

        // Dropping the PersistError drops the temp file, which removes it
        temp.persist(path)
            .map_err(|e| EnvFileError::io(e.error, path, "rename"))?;

        debug!(path = %path.display(), entries = self.len(), "Wrote env file");
        Ok(())
    }
}

/// Follow symlinks so the rename lands on the file they point to
fn resolve_target(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_write_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");

        let mut file = EnvFile::new();
        file.insert("A", "x").unwrap();
        file.write_atomic(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "A=x\n");
        assert_eq!(dir_entries(dir.path()), [".env"]);
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "OLD=1\n").unwrap();

        let mut file = EnvFile::load(&path).unwrap();
        file.insert("NEW", "2").unwrap();
        file.write_atomic(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "OLD=1\nNEW=2\n");
        assert_eq!(dir_entries(dir.path()), [".env"]);
    }

    #[test]
    fn test_write_into_missing_directory_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join(".env");

        let err = EnvFile::new().write_atomic(&path).unwrap_err();
        assert!(matches!(err, EnvFileError::Io { .. }));
        assert!(err.to_string().contains("create temporary file"));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_over_directory_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("occupied");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("inner"), "keep").unwrap();

        let mut file = EnvFile::new();
        file.insert("A", "1").unwrap();
        let err = file.write_atomic(&path).unwrap_err();

        assert!(err.to_string().contains("rename"));
        assert_eq!(dir_entries(dir.path()), ["occupied"]);
        assert_eq!(std::fs::read_to_string(path.join("inner")).unwrap(), "keep");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "A=1\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        let mut file = EnvFile::load(&path).unwrap();
        file.insert("B", "2").unwrap();
        file.write_atomic(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_through_symlink_updates_target() {
        let dir = TempDir::new().unwrap();
        let shared = dir.path().join("shared.env");
        let link = dir.path().join(".env");
        std::fs::write(&shared, "LOCAL=1\n").unwrap();
        std::os::unix::fs::symlink("shared.env", &link).unwrap();

        let mut file = EnvFile::load(&link).unwrap();
        file.insert("A", "x").unwrap();
        file.write_atomic(&link).unwrap();

        assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(std::fs::read_to_string(&shared).unwrap(), "LOCAL=1\nA=x\n");
        assert_eq!(dir_entries(dir.path()), [".env", "shared.env"]);
    }
}
