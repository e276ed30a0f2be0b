//! Filesystem access used by discovery.
//!
//! Discovery only needs to list directories and read whole files. Keeping
//! that behind a trait lets tests run against an in-memory tree and lets
//! embedders scope reads to a sandbox.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// Read-only filesystem capability.
///
/// Implementations must report a missing file as `io::ErrorKind::NotFound`;
/// discovery treats that kind as "contributes nothing" and logs every other
/// error.
pub trait EnvFileSystem: Send + Sync {
    /// Names of the immediate subdirectories of `path`.
    fn list_dirs(&self, path: &Path) -> io::Result<Vec<String>>;

    /// Whole-file read as UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl EnvFileSystem for LocalFileSystem {
    fn list_dirs(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            // Follows symlinks so linked app directories are included.
            let is_dir = std::fs::metadata(entry.path())
                .map(|m| m.is_dir())
                .unwrap_or(false);
            if !is_dir {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// In-memory tree for tests and embedding.
///
/// Files are keyed by full path; directories exist implicitly as parents of
/// files. Paths registered with `fail_with` return that error kind when read.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: BTreeMap<PathBuf, String>,
    failures: BTreeMap<PathBuf, io::ErrorKind>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    pub fn fail_with(mut self, path: impl Into<PathBuf>, kind: io::ErrorKind) -> Self {
        self.failures.insert(path.into(), kind);
        self
    }
}

impl EnvFileSystem for MemoryFileSystem {
    fn list_dirs(&self, path: &Path) -> io::Result<Vec<String>> {
        if let Some(kind) = self.failures.get(path) {
            return Err(io::Error::new(*kind, "injected failure"));
        }

        let mut names: Vec<String> = self
            .files
            .keys()
            .chain(self.failures.keys())
            .filter_map(|p| p.strip_prefix(path).ok())
            .filter(|rest| rest.components().count() > 1)
            .filter_map(|rest| rest.components().next())
            .filter_map(|c| c.as_os_str().to_str().map(str::to_string))
            .collect();
        names.sort();
        names.dedup();

        if names.is_empty() && !self.files.keys().any(|p| p.starts_with(path)) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such directory"));
        }
        Ok(names)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        if let Some(kind) = self.failures.get(path) {
            return Err(io::Error::new(*kind, "injected failure"));
        }
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_list_dirs() {
        let fs = MemoryFileSystem::new()
            .with_file("/repo/apps/web/.env", "A=1")
            .with_file("/repo/apps/web/.env.local", "B=2")
            .with_file("/repo/apps/api/.env", "C=3");
        let mut dirs = fs.list_dirs(Path::new("/repo/apps")).unwrap();
        dirs.sort();
        assert_eq!(dirs, vec!["api", "web"]);
    }

    #[test]
    fn test_memory_missing_dir_and_file() {
        let fs = MemoryFileSystem::new().with_file("/repo/apps/web/.env", "A=1");
        let err = fs.list_dirs(Path::new("/elsewhere")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        let err = fs.read_to_string(Path::new("/repo/apps/web/.env.local")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_memory_injected_failure() {
        let fs = MemoryFileSystem::new()
            .fail_with("/repo/apps/web/.env", io::ErrorKind::PermissionDenied);
        let err = fs.read_to_string(Path::new("/repo/apps/web/.env")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_local_lists_only_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("web")).unwrap();
        std::fs::write(dir.path().join("README.md"), "x").unwrap();
        let names = LocalFileSystem.list_dirs(dir.path()).unwrap();
        assert_eq!(names, vec!["web"]);
    }
}
