//! Presentation of resolved state.
//!
//! Payloads go to stdout. Nothing here touches resolution: filtering and
//! masking are applied to views built from an immutable `AppEnvState`.

pub mod filter;
pub mod report;

pub use filter::VisibilityFilter;
pub use report::{
    any_masked, render_json, render_md, render_summary, AppReport, DefinitionView, ReportBuilder,
    ScanReport, VariableView,
};

use envscan_common::{OutputFormat, Result};

/// Render `report` in `format`.
///
/// `None` for `OutputFormat::Exitcode`, which prints nothing.
pub fn render(report: &ScanReport, format: OutputFormat) -> Result<Option<String>> {
    Ok(match format {
        OutputFormat::Json => Some(render_json(report)?),
        OutputFormat::Md => Some(render_md(report)),
        OutputFormat::Summary => Some(render_summary(report)),
        OutputFormat::Exitcode => None,
    })
}
