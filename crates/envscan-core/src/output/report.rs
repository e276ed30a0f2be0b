//! Report payloads and their renderings.
//!
//! A report is built from resolved state with every value passed through the
//! masker, so nothing downstream of `ReportBuilder` ever sees a raw secret.

use super::filter::VisibilityFilter;
use crate::resolve::{AppEnvState, DeprecationNotice, EnvSummary, Source, VariableState};
use chrono::{DateTime, Utc};
use envscan_common::{Mode, Result, SCHEMA_VERSION};
use envscan_model::{RuleModel, Validation};
use envscan_redact::Masker;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

/// One definition as displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefinitionView {
    pub source: String,
    pub line: usize,
    pub value: String,
}

/// One variable as displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableView {
    pub key: String,
    pub category: String,
    pub effective_value: String,
    pub effective_source: Source,
    pub is_overridden: bool,
    pub validation: Validation,
    /// Shadowed and winning definitions, lowest precedence first.
    pub definitions: Vec<DefinitionView>,
    /// The displayed values are masked.
    #[serde(skip_serializing_if = "is_false")]
    pub masked: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One application as displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppReport {
    pub app_name: String,
    pub file_path: PathBuf,
    pub mode: Mode,
    /// Counts over every key, including hidden ones.
    pub summary: EnvSummary,
    pub variables: Vec<VariableView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deprecations: Vec<DeprecationNotice>,
}

impl AppReport {
    pub fn is_valid(&self) -> bool {
        self.summary.invalid == 0
    }
}

/// Top-level payload for `scan` and `check`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub schema_version: &'static str,
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub mode: Mode,
    pub apps: Vec<AppReport>,
}

impl ScanReport {
    pub fn new(run_id: impl Into<String>, mode: Mode, apps: Vec<AppReport>) -> Self {
        ScanReport {
            schema_version: SCHEMA_VERSION,
            run_id: run_id.into(),
            generated_at: Utc::now(),
            mode,
            apps,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.apps.iter().all(AppReport::is_valid)
    }
}

/// Turns resolved state into masked, filtered views.
pub struct ReportBuilder<'a> {
    model: &'a RuleModel,
    masker: &'a Masker,
    filter: &'a VisibilityFilter,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(model: &'a RuleModel, masker: &'a Masker, filter: &'a VisibilityFilter) -> Self {
        ReportBuilder {
            model,
            masker,
            filter,
        }
    }

    pub fn app(&self, state: &AppEnvState) -> AppReport {
        let visibility = self.filter.visibility(state);
        let variables = state
            .variables
            .values()
            .filter(|v| visibility.get(&v.key).copied().unwrap_or(true))
            .map(|v| self.variable(v))
            .collect();

        AppReport {
            app_name: state.app_name.clone(),
            file_path: state.file_path.clone(),
            mode: state.mode,
            summary: state.summary(),
            variables,
            deprecations: state.deprecations.clone(),
        }
    }

    fn variable(&self, state: &VariableState) -> VariableView {
        let secret = self.model.get(&state.key).is_some_and(|d| d.secret);
        let effective = self.masker.mask(&state.key, &state.effective_value, secret);
        let mut masked = effective.was_modified;

        let definitions = state
            .definitions
            .iter()
            .map(|d| {
                let value = self.masker.mask(&d.key, &d.value, secret);
                masked |= value.was_modified;
                DefinitionView {
                    source: d.source.clone(),
                    line: d.line,
                    value: value.output,
                }
            })
            .collect();

        VariableView {
            key: state.key.clone(),
            category: state.category.clone(),
            effective_value: effective.output,
            effective_source: state.effective_source.clone(),
            is_overridden: state.is_overridden,
            validation: state.validation.clone(),
            definitions,
            masked,
        }
    }
}

/// Pretty JSON payload.
pub fn render_json(report: &ScanReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Markdown tables, one section per application.
pub fn render_md(report: &ScanReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Environment report ({})", report.mode);

    if report.apps.is_empty() {
        let _ = writeln!(out, "\nNo applications with environment files found.");
        return out;
    }

    for app in &report.apps {
        let s = &app.summary;
        let _ = writeln!(out, "\n## {}\n", app.app_name);
        let _ = writeln!(
            out,
            "`{}` · {} variables · {} invalid · {} missing · {} overridden\n",
            app.file_path.display(),
            s.total,
            s.invalid,
            s.missing,
            s.overridden
        );

        if app.variables.is_empty() {
            let _ = writeln!(out, "_No variables match the current filter._");
        } else {
            let _ = writeln!(out, "| Key | Category | Value | Source | Status |");
            let _ = writeln!(out, "|---|---|---|---|---|");
            for v in &app.variables {
                let _ = writeln!(
                    out,
                    "| `{}` | {} | {} | {} | {} |",
                    cell(&v.key),
                    cell(&v.category),
                    value_cell(v),
                    source_cell(v),
                    status_cell(&v.validation)
                );
            }
        }

        if !app.deprecations.is_empty() {
            let _ = writeln!(out, "\n### Deprecated\n");
            for d in &app.deprecations {
                let _ = write!(out, "- `{}` ({}): {}", d.key, d.source, d.deprecation.reason);
                if let Some(alt) = &d.deprecation.alternative {
                    let _ = write!(out, " Use `{}` instead.", alt);
                }
                out.push('\n');
            }
        }
    }
    out
}

/// One line per application.
pub fn render_summary(report: &ScanReport) -> String {
    if report.apps.is_empty() {
        return format!("[{}] no applications with environment files\n", report.mode);
    }
    let mut out = String::new();
    for app in &report.apps {
        let s = &app.summary;
        let status = if app.is_valid() { "OK" } else { "INVALID" };
        let _ = writeln!(
            out,
            "[{}] {}: {} ({} variables, {} invalid, {} missing, {} overridden, {} custom, {} deprecated)",
            report.mode,
            app.app_name,
            status,
            s.total,
            s.invalid,
            s.missing,
            s.overridden,
            s.custom,
            s.deprecated
        );
    }
    out
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn value_cell(v: &VariableView) -> String {
    if v.effective_source.is_missing() {
        return "_(missing)_".to_string();
    }
    if v.effective_value.is_empty() {
        return "_(empty)_".to_string();
    }
    format!("`{}`", cell(&v.effective_value))
}

fn source_cell(v: &VariableView) -> String {
    let shadowed: Vec<&str> = v
        .definitions
        .iter()
        .rev()
        .skip(1)
        .map(|d| d.source.as_str())
        .collect();
    if shadowed.is_empty() {
        v.effective_source.to_string()
    } else {
        format!("{} (overrides {})", v.effective_source, shadowed.join(", "))
    }
}

fn status_cell(validation: &Validation) -> String {
    if validation.is_valid() {
        "✓".to_string()
    } else {
        format!("✗ {}", cell(&validation.issues().join("; ")))
    }
}

/// Whether any displayed value was changed by masking.
pub fn any_masked(report: &ScanReport) -> bool {
    report
        .apps
        .iter()
        .flat_map(|a| &a.variables)
        .any(|v| v.masked)
}
