//! envscan - environment file resolution and validation
//!
//! The main entry point, handling:
//! - Discovery and resolution of every application's env files
//! - Validation against the built-in rule catalog and optional overlays
//! - Single-key lookups through the query facade
//! - Masked report rendering (JSON, Markdown, summary)

use clap::{Args, Parser, Subcommand};
use envscan_common::{format_error_human, Error, Mode, OutputFormat, Result, StructuredError, SCHEMA_VERSION};
use envscan_core::config::{CliOverrides, ConfigSource, ToolConfig};
use envscan_core::exit_codes::ExitCode;
use envscan_core::facade::{EnvQuery, DEFAULT_APP};
use envscan_core::logging::{event_names, generate_run_id, init_logging, LogConfig, LogContext};
use envscan_core::output::{self, ReportBuilder, ScanReport, VisibilityFilter};
use envscan_core::resolve::Resolver;
use envscan_core::scanner::EnvScanner;
use envscan_model::{DescriptorSummary, RuleModel};
use envscan_redact::Masker;
use serde_json::json;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::error;

/// Resolve, validate and inspect monorepo env files
#[derive(Parser)]
#[command(name = "envscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Monorepo root containing apps/ [env: ENVSCAN_ROOT]
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Environment mode [env: ENVSCAN_MODE]
    #[arg(long, short = 'm', global = true, value_enum)]
    mode: Option<Mode>,

    /// Application to inspect (repeatable) [env: ENVSCAN_APPS]
    #[arg(long = "app", short = 'a', global = true)]
    apps: Vec<String>,

    /// JSON rule overlay [env: ENVSCAN_RULES]
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// JSON mask policy [env: ENVSCAN_MASK_POLICY]
    #[arg(long, global = true)]
    mask_policy: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    quiet: u8,

    /// Show secret values unmasked
    #[arg(long, global = true)]
    reveal: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every selected application and print its state
    Scan(ReportArgs),
    /// Like scan, but exit 1 when any variable is invalid
    Check(ReportArgs),
    /// Print the effective value of one variable
    Get(GetArgs),
    /// List application directories under apps/
    Apps,
    /// List the active rule model
    Rules(RulesArgs),
    /// Print version information
    Version,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Scan(_) => "scan",
            Commands::Check(_) => "check",
            Commands::Get(_) => "get",
            Commands::Apps => "apps",
            Commands::Rules(_) => "rules",
            Commands::Version => "version",
        }
    }
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Only show variables in this category
    #[arg(long)]
    category: Option<String>,

    /// Only show variables that fail validation
    #[arg(long)]
    invalid_only: bool,

    /// Only show variables defined in more than one file
    #[arg(long)]
    overridden_only: bool,

    /// Only show keys containing this text
    #[arg(long)]
    search: Option<String>,
}

impl ReportArgs {
    fn filter(&self) -> VisibilityFilter {
        let mut filter = VisibilityFilter::new()
            .invalid_only(self.invalid_only)
            .overridden_only(self.overridden_only);
        if let Some(category) = &self.category {
            filter = filter.with_category(category.clone());
        }
        if let Some(search) = &self.search {
            filter = filter.with_search(search.clone());
        }
        filter
    }
}

#[derive(Args, Debug)]
struct GetArgs {
    /// Variable name
    key: String,
}

#[derive(Args, Debug)]
struct RulesArgs {
    /// Only list descriptors in this category
    #[arg(long)]
    category: Option<String>,
}

fn main() -> std::process::ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                // --help and --version
                ExitCode::Clean
            };
            let _ = err.print();
            return code.into();
        }
    };

    init_logging(&LogConfig::from_env(cli.global.verbose, cli.global.quiet));

    let ctx = LogContext::new(generate_run_id(), cli.command.name());
    let _span = ctx.span().entered();

    match run(&cli, &ctx) {
        Ok(code) => code.into(),
        Err(err) => {
            error!(
                event = event_names::COMMAND_FAILED,
                code = err.code(),
                category = %err.category(),
                "{}",
                err
            );
            print_error(&err, cli.global.format);
            ExitCode::from(&err).into()
        }
    }
}

fn run(cli: &Cli, ctx: &LogContext) -> Result<ExitCode> {
    if let Commands::Version = cli.command {
        print_version(cli.global.format);
        return Ok(ExitCode::Clean);
    }

    let global = &cli.global;
    let config = ToolConfig::resolve(&CliOverrides {
        root: global.root.clone(),
        apps: global.apps.clone(),
        mode: global.mode,
        rules: global.rules.clone(),
        mask_policy: global.mask_policy.clone(),
    })?;

    match &cli.command {
        Commands::Scan(args) => run_report(global, &config, ctx, args, false),
        Commands::Check(args) => run_report(global, &config, ctx, args, true),
        Commands::Get(args) => run_get(global, &config, args),
        Commands::Apps => run_apps(global, &config, ctx),
        Commands::Rules(args) => run_rules(global, &config, ctx, args),
        Commands::Version => Ok(ExitCode::Clean),
    }
}

fn run_report(
    global: &GlobalOpts,
    config: &ToolConfig,
    ctx: &LogContext,
    args: &ReportArgs,
    strict: bool,
) -> Result<ExitCode> {
    let model = config.load_model()?;
    let masker = build_masker(config, global.reveal)?;
    let scanner = EnvScanner::local();
    let root = &config.root.value;
    let mode = config.mode.value;

    ensure_apps_exist(&scanner, config)?;
    let found = scanner.scan(root, &config.apps.value, mode)?;

    let filter = args.filter();
    let resolver = Resolver::new(&model);
    let builder = ReportBuilder::new(&model, &masker, &filter);
    let apps = found
        .iter()
        .map(|info| builder.app(&resolver.resolve(info, mode)))
        .collect();
    let report = ScanReport::new(ctx.run_id.clone(), mode, apps);

    if let Some(rendered) = output::render(&report, global.format)? {
        print_payload(&rendered);
    }

    let gate = strict || global.format == OutputFormat::Exitcode;
    Ok(if gate && !report.is_valid() {
        ExitCode::Invalid
    } else {
        ExitCode::Clean
    })
}

fn run_get(global: &GlobalOpts, config: &ToolConfig, args: &GetArgs) -> Result<ExitCode> {
    let model = config.load_model()?;
    let masker = build_masker(config, global.reveal)?;
    let app = config
        .apps
        .value
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_APP.to_string());
    let mode = config.mode.value;

    let query = EnvQuery::new(&config.root.value, &model, EnvScanner::local()).with_app(app);
    let value = query.get_variable(&args.key, mode)?;
    let secret = model.get(&args.key).is_some_and(|d| d.secret);
    let shown = masker.mask(&args.key, &value, secret);

    match global.format {
        OutputFormat::Json => print_payload(&to_pretty(&json!({
            "schema_version": SCHEMA_VERSION,
            "app": query.app(),
            "mode": mode,
            "key": args.key,
            "value": shown.output,
            "masked": shown.was_modified,
        }))?),
        OutputFormat::Md | OutputFormat::Summary => print_payload(&shown.output),
        OutputFormat::Exitcode => {}
    }
    Ok(ExitCode::Clean)
}

fn run_apps(global: &GlobalOpts, config: &ToolConfig, ctx: &LogContext) -> Result<ExitCode> {
    let apps = EnvScanner::local().list_apps(&config.root.value)?;
    match global.format {
        OutputFormat::Json => print_payload(&to_pretty(&json!({
            "schema_version": SCHEMA_VERSION,
            "run_id": ctx.run_id,
            "root": config.root.value,
            "apps": apps,
        }))?),
        OutputFormat::Md | OutputFormat::Summary => {
            for app in &apps {
                print_payload(app);
            }
        }
        OutputFormat::Exitcode => {}
    }
    Ok(ExitCode::Clean)
}

fn run_rules(
    global: &GlobalOpts,
    config: &ToolConfig,
    ctx: &LogContext,
    args: &RulesArgs,
) -> Result<ExitCode> {
    let model = config.load_model()?;
    let rules = rule_summaries(&model, args.category.as_deref());

    match global.format {
        OutputFormat::Json => print_payload(&to_pretty(&json!({
            "schema_version": SCHEMA_VERSION,
            "run_id": ctx.run_id,
            "overlay": config.rules.value,
            "categories": model.categories(),
            "rules": rules,
        }))?),
        OutputFormat::Md => {
            let mut out = String::from("| Name | Category | Type | Required | Secret | Depends on |\n");
            out.push_str("|---|---|---|---|---|---|\n");
            for r in &rules {
                out.push_str(&format!(
                    "| `{}` | {} | {} | {} | {} | {} |\n",
                    r.name,
                    r.category,
                    r.var_type,
                    yes_no(r.required),
                    yes_no(r.secret),
                    r.depends_on.join(", ")
                ));
            }
            print_payload(out.trim_end());
        }
        OutputFormat::Summary => {
            let source = match config.rules.source {
                ConfigSource::BuiltinDefault => "built-in catalog".to_string(),
                other => format!("built-in catalog + overlay ({})", other),
            };
            print_payload(&format!("{} rules in {} categories, {}", rules.len(), model.categories().len(), source));
        }
        OutputFormat::Exitcode => {}
    }
    Ok(ExitCode::Clean)
}

fn rule_summaries(model: &RuleModel, category: Option<&str>) -> Vec<DescriptorSummary> {
    model
        .iter()
        .filter(|d| category.is_none_or(|c| d.category.eq_ignore_ascii_case(c)))
        .map(|d| d.summary())
        .collect()
}

/// Explicitly requested applications must have a directory.
fn ensure_apps_exist(scanner: &EnvScanner, config: &ToolConfig) -> Result<()> {
    if config.apps.value.is_empty() {
        return Ok(());
    }
    let available = scanner.list_apps(&config.root.value)?;
    match config.apps.value.iter().find(|a| !available.contains(a)) {
        Some(app) => Err(Error::AppNotFound { app: app.clone() }),
        None => Ok(()),
    }
}

fn build_masker(config: &ToolConfig, reveal: bool) -> Result<Masker> {
    let policy = config.load_mask_policy(reveal)?;
    Masker::new(policy).map_err(|e| Error::Config(format!("mask policy: {}", e)))
}

fn print_version(format: OutputFormat) {
    let version = env!("CARGO_PKG_VERSION");
    match format {
        OutputFormat::Json => {
            let payload = json!({
                "name": "envscan",
                "version": version,
                "schema_version": SCHEMA_VERSION,
            });
            if let Ok(rendered) = to_pretty(&payload) {
                print_payload(&rendered);
            }
        }
        OutputFormat::Exitcode => {}
        _ => print_payload(&format!("envscan {} (schema {})", version, SCHEMA_VERSION)),
    }
}

fn print_error(err: &Error, format: OutputFormat) {
    if format.is_machine() {
        print_payload(&StructuredError::from(err).to_json_pretty());
    } else {
        eprintln!("{}", format_error_human(err, std::io::stderr().is_terminal()));
    }
}

fn print_payload(text: &str) {
    println!("{}", text);
}

fn to_pretty(value: &serde_json::Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
