//! File discovery.
//!
//! Walks `<root>/apps/*` and reads each selected application's env files in
//! the mode's precedence order. Reads are sequential, one application and
//! one file at a time, so warnings come out in a stable order.

use crate::fs::{EnvFileSystem, LocalFileSystem};
use crate::logging::event_names;
use crate::parse::parse_env;
use envscan_common::{Error, Mode, Result};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory under the root that holds one subdirectory per application.
pub const APPS_DIR: &str = "apps";

/// One assignment parsed from one env file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDefinition {
    pub key: String,
    pub value: String,
    /// File name the definition came from, e.g. `.env.local`.
    pub source: String,
    /// 1-based line number within `source`.
    pub line: usize,
}

/// Everything read for one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppFileInfo {
    pub app_name: String,
    /// The application directory.
    pub file_path: PathBuf,
    /// Definitions in file-read order.
    pub variables: Vec<RawDefinition>,
}

/// Reads env files through an `EnvFileSystem`.
pub struct EnvScanner<F: EnvFileSystem = LocalFileSystem> {
    fs: F,
}

impl EnvScanner<LocalFileSystem> {
    pub fn local() -> Self {
        EnvScanner {
            fs: LocalFileSystem,
        }
    }
}

impl Default for EnvScanner<LocalFileSystem> {
    fn default() -> Self {
        Self::local()
    }
}

impl<F: EnvFileSystem> EnvScanner<F> {
    pub fn new(fs: F) -> Self {
        EnvScanner { fs }
    }

    /// Names of every application directory under `<root>/apps`, sorted.
    pub fn list_apps(&self, root: &Path) -> Result<Vec<String>> {
        let apps_dir = root.join(APPS_DIR);
        let mut names = self
            .fs
            .list_dirs(&apps_dir)
            .map_err(|source| Error::AppsDirUnreadable {
                path: apps_dir.clone(),
                source,
            })?;
        names.sort();
        Ok(names)
    }

    /// Scan the selected applications.
    ///
    /// An empty `apps` selects every application. Requested names without a
    /// directory are skipped, as are applications whose files define nothing.
    /// Only failing to list `<root>/apps` is an error.
    pub fn scan(&self, root: &Path, apps: &[String], mode: Mode) -> Result<Vec<AppFileInfo>> {
        let available = self.list_apps(root)?;
        let selected: Vec<&String> = if apps.is_empty() {
            available.iter().collect()
        } else {
            available.iter().filter(|a| apps.contains(*a)).collect()
        };

        info!(
            event = event_names::SCAN_STARTED,
            root = %root.display(),
            mode = %mode,
            apps = selected.len(),
            "Scanning env files"
        );

        let mut results = Vec::new();
        for app in selected {
            let app_dir = root.join(APPS_DIR).join(app);
            let variables = self.read_app(&app_dir, mode);
            if variables.is_empty() {
                debug!(app = %app, "No variables found; omitting application");
                continue;
            }
            results.push(AppFileInfo {
                app_name: app.clone(),
                file_path: app_dir,
                variables,
            });
        }

        info!(
            event = event_names::SCAN_FINISHED,
            apps = results.len(),
            definitions = results.iter().map(|a| a.variables.len()).sum::<usize>(),
            "Scan finished"
        );
        Ok(results)
    }

    /// Scan a single application by name.
    pub fn scan_app(&self, root: &Path, app: &str, mode: Mode) -> Result<Option<AppFileInfo>> {
        let mut found = self.scan(root, &[app.to_string()], mode)?;
        Ok(found.pop())
    }

    fn read_app(&self, app_dir: &Path, mode: Mode) -> Vec<RawDefinition> {
        let mut variables = Vec::new();
        for file_name in mode.env_files() {
            let path = app_dir.join(file_name);
            match self.fs.read_to_string(&path) {
                Ok(content) => {
                    let parsed = parse_env(&content, file_name);
                    debug!(
                        event = event_names::SCAN_FILE_READ,
                        path = %path.display(),
                        definitions = parsed.len(),
                        "Read env file"
                    );
                    variables.extend(parsed);
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(
                        event = event_names::SCAN_FILE_SKIPPED,
                        path = %path.display(),
                        "Env file not present"
                    );
                }
                Err(e) => {
                    warn!(
                        event = event_names::SCAN_FILE_UNREADABLE,
                        path = %path.display(),
                        error = %e,
                        "Skipping unreadable env file"
                    );
                }
            }
        }
        variables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    fn repo() -> MemoryFileSystem {
        MemoryFileSystem::new()
            .with_file("/repo/apps/web/.env", "A=base\nB=base")
            .with_file("/repo/apps/web/.env.development", "A=dev")
            .with_file("/repo/apps/web/.env.production", "A=prod")
            .with_file("/repo/apps/web/.env.local", "C=local")
            .with_file("/repo/apps/docs/.env", "# nothing here\n")
            .with_file("/repo/apps/api/.env.production.local", "D=1")
    }

    #[test]
    fn test_scan_reads_mode_files_in_order() {
        let scanner = EnvScanner::new(repo());
        let apps = scanner
            .scan(Path::new("/repo"), &["web".to_string()], Mode::Development)
            .unwrap();
        assert_eq!(apps.len(), 1);
        let sources: Vec<&str> = apps[0].variables.iter().map(|d| d.source.as_str()).collect();
        assert_eq!(sources, vec![".env", ".env", ".env.development", ".env.local"]);
        assert_eq!(apps[0].file_path, PathBuf::from("/repo/apps/web"));
    }

    #[test]
    fn test_scan_never_reads_other_mode_files() {
        let scanner = EnvScanner::new(repo());
        let apps = scanner
            .scan(Path::new("/repo"), &["web".to_string()], Mode::Production)
            .unwrap();
        assert!(apps[0].variables.iter().all(|d| d.source != ".env.development"));
        assert!(apps[0].variables.iter().any(|d| d.source == ".env.production"));
    }

    #[test]
    fn test_scan_all_apps_sorted_and_empty_omitted() {
        let scanner = EnvScanner::new(repo());
        let apps = scanner.scan(Path::new("/repo"), &[], Mode::Production).unwrap();
        let names: Vec<&str> = apps.iter().map(|a| a.app_name.as_str()).collect();
        assert_eq!(names, vec!["api", "web"]);
    }

    #[test]
    fn test_unknown_app_is_skipped() {
        let scanner = EnvScanner::new(repo());
        let apps = scanner
            .scan(Path::new("/repo"), &["mobile".to_string()], Mode::Development)
            .unwrap();
        assert!(apps.is_empty());
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let fs = repo().fail_with("/repo/apps/web/.env.local", io::ErrorKind::PermissionDenied);
        let scanner = EnvScanner::new(fs);
        let app = scanner
            .scan_app(Path::new("/repo"), "web", Mode::Development)
            .unwrap()
            .unwrap();
        assert!(app.variables.iter().all(|d| d.source != ".env.local"));
        assert!(!app.variables.is_empty());
    }

    #[test]
    fn test_missing_apps_dir_is_fatal() {
        let scanner = EnvScanner::new(MemoryFileSystem::new());
        let err = scanner.scan(Path::new("/nowhere"), &[], Mode::Development).unwrap_err();
        assert!(matches!(err, Error::AppsDirUnreadable { .. }));
        assert_eq!(err.code(), 20);
    }
}
