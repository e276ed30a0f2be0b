//! Tool configuration resolution.
//!
//! Resolution order for each setting: CLI arguments → environment variables →
//! XDG config directory → defaults. The winning source is kept for
//! diagnostics and reported in `config.resolved` events.

use crate::logging::event_names;
use envscan_common::{Error, Mode, Result};
use envscan_model::{RuleModel, RuleOverlay};
use envscan_redact::MaskPolicy;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable names.
pub const ENV_ROOT: &str = "ENVSCAN_ROOT";
pub const ENV_APPS: &str = "ENVSCAN_APPS";
pub const ENV_MODE: &str = "ENVSCAN_MODE";
pub const ENV_RULES: &str = "ENVSCAN_RULES";
pub const ENV_MASK_POLICY: &str = "ENVSCAN_MASK_POLICY";

/// Standard config file names inside the XDG directory.
const RULES_FILENAME: &str = "rules.json";
const MASK_POLICY_FILENAME: &str = "mask.json";

/// Application name for XDG directories.
const APP_NAME: &str = "envscan";

/// Where a setting came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    CliArgument,
    Environment,
    XdgConfig,
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// A resolved value together with its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sourced<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> Sourced<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Sourced { value, source }
    }
}

/// Settings given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root: Option<PathBuf>,
    pub apps: Vec<String>,
    pub mode: Option<Mode>,
    pub rules: Option<PathBuf>,
    pub mask_policy: Option<PathBuf>,
}

/// Fully resolved tool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolConfig {
    pub root: Sourced<PathBuf>,
    /// Empty means every application under `apps/`.
    pub apps: Sourced<Vec<String>>,
    pub mode: Sourced<Mode>,
    pub rules: Sourced<Option<PathBuf>>,
    pub mask_policy: Sourced<Option<PathBuf>>,
}

impl ToolConfig {
    /// Resolve against the process environment and the user's XDG directory.
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let resolver = ConfigResolver {
            lookup: |name: &str| std::env::var(name).ok(),
            xdg_dir: xdg_config_dir(),
        };
        resolver.resolve(cli)
    }

    /// Load the rule model: the built-in catalog plus the overlay, if any.
    pub fn load_model(&self) -> Result<RuleModel> {
        let Some(path) = &self.rules.value else {
            return Ok(RuleModel::builtin_owned());
        };
        let overlay = RuleOverlay::from_file(path)?;
        let count = overlay.variables.len();
        let model = RuleModel::builtin_owned().merge(overlay.into_descriptors()?)?;
        info!(
            event = event_names::RULES_OVERLAY_LOADED,
            path = %path.display(),
            source = %self.rules.source,
            variables = count,
            total = model.len(),
            "Loaded rule overlay"
        );
        Ok(model)
    }

    /// Load the mask policy, or the default one.
    ///
    /// `reveal` wins over any file.
    pub fn load_mask_policy(&self, reveal: bool) -> Result<MaskPolicy> {
        if reveal {
            return Ok(MaskPolicy::reveal());
        }
        match &self.mask_policy.value {
            Some(path) => MaskPolicy::load(path).map_err(|e| {
                Error::Config(format!("mask policy {}: {}", path.display(), e))
            }),
            None => Ok(MaskPolicy::default()),
        }
    }
}

/// Resolver with injectable environment and XDG directory.
pub struct ConfigResolver<F> {
    pub lookup: F,
    pub xdg_dir: Option<PathBuf>,
}

impl<F> ConfigResolver<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn resolve(&self, cli: &CliOverrides) -> Result<ToolConfig> {
        let config = ToolConfig {
            root: self.resolve_root(cli),
            apps: self.resolve_apps(cli),
            mode: self.resolve_mode(cli)?,
            rules: self.resolve_file(cli.rules.as_deref(), ENV_RULES, RULES_FILENAME)?,
            mask_policy: self.resolve_file(
                cli.mask_policy.as_deref(),
                ENV_MASK_POLICY,
                MASK_POLICY_FILENAME,
            )?,
        };

        debug!(
            event = event_names::CONFIG_RESOLVED,
            root = %config.root.value.display(),
            root_source = %config.root.source,
            mode = %config.mode.value,
            mode_source = %config.mode.source,
            apps = config.apps.value.len(),
            rules_source = %config.rules.source,
            mask_policy_source = %config.mask_policy.source,
            "Resolved configuration"
        );
        Ok(config)
    }

    fn env(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.trim().is_empty())
    }

    fn resolve_root(&self, cli: &CliOverrides) -> Sourced<PathBuf> {
        if let Some(root) = &cli.root {
            return Sourced::new(root.clone(), ConfigSource::CliArgument);
        }
        if let Some(root) = self.env(ENV_ROOT) {
            return Sourced::new(PathBuf::from(root), ConfigSource::Environment);
        }
        Sourced::new(PathBuf::from("."), ConfigSource::BuiltinDefault)
    }

    fn resolve_apps(&self, cli: &CliOverrides) -> Sourced<Vec<String>> {
        if !cli.apps.is_empty() {
            return Sourced::new(cli.apps.clone(), ConfigSource::CliArgument);
        }
        if let Some(list) = self.env(ENV_APPS) {
            let apps = list
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect();
            return Sourced::new(apps, ConfigSource::Environment);
        }
        Sourced::new(Vec::new(), ConfigSource::BuiltinDefault)
    }

    fn resolve_mode(&self, cli: &CliOverrides) -> Result<Sourced<Mode>> {
        if let Some(mode) = cli.mode {
            return Ok(Sourced::new(mode, ConfigSource::CliArgument));
        }
        if let Some(raw) = self.env(ENV_MODE) {
            let mode = raw.parse::<Mode>().map_err(Error::InvalidMode)?;
            return Ok(Sourced::new(mode, ConfigSource::Environment));
        }
        Ok(Sourced::new(Mode::default(), ConfigSource::BuiltinDefault))
    }

    /// Explicit paths must exist. The XDG file is optional.
    fn resolve_file(
        &self,
        cli_path: Option<&Path>,
        env_var: &str,
        filename: &str,
    ) -> Result<Sourced<Option<PathBuf>>> {
        let explicit = cli_path
            .map(|p| (p.to_path_buf(), ConfigSource::CliArgument))
            .or_else(|| {
                self.env(env_var)
                    .map(|p| (PathBuf::from(p), ConfigSource::Environment))
            });

        if let Some((path, source)) = explicit {
            if !path.is_file() {
                return Err(Error::Config(format!(
                    "{} not found: {} (from {})",
                    filename,
                    path.display(),
                    source
                )));
            }
            return Ok(Sourced::new(Some(path), source));
        }

        if let Some(dir) = &self.xdg_dir {
            let path = dir.join(filename);
            if path.is_file() {
                return Ok(Sourced::new(Some(path), ConfigSource::XdgConfig));
            }
        }

        Ok(Sourced::new(None, ConfigSource::BuiltinDefault))
    }
}

/// Get the XDG config directory for envscan.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn resolver(
        pairs: &[(&str, &str)],
        xdg_dir: Option<PathBuf>,
    ) -> ConfigResolver<impl Fn(&str) -> Option<String>> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConfigResolver {
            lookup: move |name: &str| map.get(name).cloned(),
            xdg_dir,
        }
    }

    #[test]
    fn test_defaults() {
        let config = resolver(&[], None).resolve(&CliOverrides::default()).unwrap();
        assert_eq!(config.root.value, PathBuf::from("."));
        assert_eq!(config.root.source, ConfigSource::BuiltinDefault);
        assert!(config.apps.value.is_empty());
        assert_eq!(config.mode.value, Mode::Development);
        assert!(config.rules.value.is_none());
        assert!(config.mask_policy.value.is_none());
    }

    #[test]
    fn test_cli_beats_env() {
        let cli = CliOverrides {
            root: Some(PathBuf::from("/cli")),
            mode: Some(Mode::Production),
            apps: vec!["web".into()],
            ..CliOverrides::default()
        };
        let config = resolver(
            &[(ENV_ROOT, "/env"), (ENV_MODE, "development"), (ENV_APPS, "docs")],
            None,
        )
        .resolve(&cli)
        .unwrap();
        assert_eq!(config.root.value, PathBuf::from("/cli"));
        assert_eq!(config.root.source, ConfigSource::CliArgument);
        assert_eq!(config.mode.value, Mode::Production);
        assert_eq!(config.apps.value, vec!["web".to_string()]);
    }

    #[test]
    fn test_env_values() {
        let config = resolver(
            &[(ENV_ROOT, "/env"), (ENV_MODE, "prod"), (ENV_APPS, "web, docs,,")],
            None,
        )
        .resolve(&CliOverrides::default())
        .unwrap();
        assert_eq!(config.root.source, ConfigSource::Environment);
        assert_eq!(config.mode.value, Mode::Production);
        assert_eq!(config.apps.value, vec!["web".to_string(), "docs".to_string()]);
    }

    #[test]
    fn test_invalid_env_mode() {
        let err = resolver(&[(ENV_MODE, "staging")], None)
            .resolve(&CliOverrides::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMode(_)));
        assert_eq!(err.code(), 11);
    }

    #[test]
    fn test_xdg_rules_used_when_present() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(RULES_FILENAME), "{}").unwrap();
        let config = resolver(&[], Some(dir.path().to_path_buf()))
            .resolve(&CliOverrides::default())
            .unwrap();
        assert_eq!(config.rules.source, ConfigSource::XdgConfig);
        assert_eq!(config.rules.value, Some(dir.path().join(RULES_FILENAME)));
        assert_eq!(config.mask_policy.source, ConfigSource::BuiltinDefault);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let cli = CliOverrides {
            rules: Some(PathBuf::from("/definitely/not/here.json")),
            ..CliOverrides::default()
        };
        let err = resolver(&[], None).resolve(&cli).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_model_with_overlay() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(
            &path,
            r#"{"schema_version": "1.0.0", "variables": [{"name": "ANALYTICS_ID", "required": true}]}"#,
        )
        .unwrap();
        let cli = CliOverrides {
            rules: Some(path),
            ..CliOverrides::default()
        };
        let config = resolver(&[], None).resolve(&cli).unwrap();
        let model = config.load_model().unwrap();
        assert!(model.contains("ANALYTICS_ID"));
        assert!(model.contains("NEXT_PUBLIC_SITE_URL"));
    }

    #[test]
    fn test_load_model_rejects_bad_overlay() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, "not json").unwrap();
        let cli = CliOverrides {
            rules: Some(path),
            ..CliOverrides::default()
        };
        let config = resolver(&[], None).resolve(&cli).unwrap();
        let err = config.load_model().unwrap_err();
        assert!(matches!(err, Error::InvalidRules(_)));
    }

    #[test]
    fn test_reveal_overrides_mask_policy() {
        let config = resolver(&[], None).resolve(&CliOverrides::default()).unwrap();
        assert!(config.load_mask_policy(true).unwrap().is_reveal());
        assert!(!config.load_mask_policy(false).unwrap().is_reveal());
    }
}
