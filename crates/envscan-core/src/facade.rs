//! Query facade: one effective value by key.
//!
//! Every call rescans and re-resolves from disk, so a lookup always reflects
//! the current files. Callers needing many keys should call [`EnvQuery::state`]
//! once and read the map instead.

use crate::fs::{EnvFileSystem, LocalFileSystem};
use crate::resolve::{AppEnvState, Resolver};
use crate::scanner::EnvScanner;
use envscan_common::{Mode, Result};
use envscan_model::RuleModel;
use std::path::{Path, PathBuf};

/// Application the facade reads when none is given.
pub const DEFAULT_APP: &str = "web";

/// Lookup handle bound to one monorepo root and one application.
pub struct EnvQuery<'m, F: EnvFileSystem = LocalFileSystem> {
    root: PathBuf,
    app: String,
    model: &'m RuleModel,
    scanner: EnvScanner<F>,
}

impl EnvQuery<'static> {
    /// Query `DEFAULT_APP` on the local filesystem with the built-in catalog.
    pub fn local(root: impl Into<PathBuf>) -> Self {
        EnvQuery::new(root, RuleModel::builtin(), EnvScanner::local())
    }
}

impl<'m, F: EnvFileSystem> EnvQuery<'m, F> {
    pub fn new(root: impl Into<PathBuf>, model: &'m RuleModel, scanner: EnvScanner<F>) -> Self {
        EnvQuery {
            root: root.into(),
            app: DEFAULT_APP.to_string(),
            model,
            scanner,
        }
    }

    /// Read a different application.
    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = app.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    /// Fresh resolved state of the bound application.
    ///
    /// `None` when the application directory has no readable variables.
    pub fn state(&self, mode: Mode) -> Result<Option<AppEnvState>> {
        let info = self.scanner.scan_app(&self.root, &self.app, mode)?;
        Ok(info.map(|info| Resolver::new(self.model).resolve(&info, mode)))
    }

    /// Effective value of `key`, or `""` when nothing defines it.
    pub fn get_variable(&self, key: &str, mode: Mode) -> Result<String> {
        Ok(self
            .state(mode)?
            .map(|state| state.effective_value(key).to_string())
            .unwrap_or_default())
    }
}

/// Effective value of `key` for `DEFAULT_APP` under `root`.
pub fn get_variable(root: &Path, key: &str, mode: Mode) -> Result<String> {
    EnvQuery::local(root).get_variable(key, mode)
}
