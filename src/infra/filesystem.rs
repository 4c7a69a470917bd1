//! Filesystem operations
//!
//! Handles file and directory operations.

use std::path::Path;

use crate::error::FilesystemError;

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    std::fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Write content to a file, creating missing parent directories
pub fn write_file(path: &Path, content: &str) -> Result<(), FilesystemError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)?;
    }
    std::fs::write(path, content).map_err(|e| FilesystemError::WriteFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Read content from a file
pub fn read_file(path: &Path) -> Result<String, FilesystemError> {
    std::fs::read_to_string(path).map_err(|e| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Whether `path` contains a file called `marker`
pub fn has_marker(path: &Path, marker: &str) -> bool {
    path.join(marker).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a/b/out.cmake");

        write_file(&file, "set(X 1)\n").unwrap();

        assert_eq!(read_file(&file).unwrap(), "set(X 1)\n");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_file(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, FilesystemError::ReadFile { .. }));
    }

    #[test]
    fn test_has_marker() {
        let dir = TempDir::new().unwrap();
        assert!(!has_marker(dir.path(), ".orderly"));
        std::fs::write(dir.path().join(".orderly"), "").unwrap();
        assert!(has_marker(dir.path(), ".orderly"));
    }
}
