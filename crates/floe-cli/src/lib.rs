//! `floe` command line.
//!
//! Wires engine config, the graph manifest, and the policy tiers into one
//! enforcement run and writes the report.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use floe_core::config::{CliOverrides, FloeConfig};
use floe_core::errors::{ConfigError, EnforceError, EnforceResult, FloeErrorCode};
use floe_policy::enforcement::{
    EnforcementResult, EnforcerOptions, PolicyEnforcer, ReportExporter, ReportFormat,
};
use floe_policy::graph::load_graph;
use floe_policy::inheritance::{EnforcementLevel, InheritanceResolver, PolicyDocument, Tier};

/// Exit status for a fatal configuration, document, or IO error.
pub const EXIT_FATAL: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "floe")]
#[command(about = "Enforce data governance policy against a compiled model graph.", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate the manifest against the resolved policy chain and write a report.
    Enforce(EnforceArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct EnforceArgs {
    /// Compiled graph manifest (JSON).
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Foundation tier policy document.
    #[arg(long)]
    pub foundation: Option<PathBuf>,

    /// Platform tier policy document.
    #[arg(long)]
    pub platform: Option<PathBuf>,

    /// Data-product tier policy document.
    #[arg(long)]
    pub product: Option<PathBuf>,

    /// Requested level. May only strengthen the policy's level.
    #[arg(long, value_parser = ["off", "warn", "strict"])]
    pub level: Option<String>,

    /// Report format.
    #[arg(long, value_parser = ["json", "sarif", "html"])]
    pub output_format: Option<String>,

    /// Report output directory.
    #[arg(long = "output")]
    pub output_dir: Option<PathBuf>,

    /// Engine config file. Defaults to `floe.toml` in the working directory.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Attach downstream impact to every violation.
    #[arg(long)]
    pub downstream_impact: bool,
}

impl EnforceArgs {
    fn overrides(&self) -> CliOverrides {
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
        CliOverrides {
            level: self.level.clone(),
            output_format: self.output_format.clone(),
            output_dir: path(&self.output_dir),
            manifest: path(&self.manifest),
            foundation: path(&self.foundation),
            platform: path(&self.platform),
            product: path(&self.product),
        }
    }
}

/// What a completed run produced.
#[derive(Debug)]
pub struct EnforceOutcome {
    pub result: EnforcementResult,
    pub report_path: PathBuf,
}

impl EnforceOutcome {
    pub fn exit_code(&self) -> u8 {
        self.result.exit_code() as u8
    }
}

fn load_config(args: &EnforceArgs) -> Result<FloeConfig, ConfigError> {
    let overrides = args.overrides();
    match &args.config {
        Some(path) => FloeConfig::load_file(path, Some(&overrides)),
        None => FloeConfig::load(Path::new("."), Some(&overrides)),
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Run `floe enforce`. Fatal problems come back as `Err`; a strict-mode
/// failure is a successful run with a failing result.
pub fn run_enforce(args: &EnforceArgs) -> EnforceResult<EnforceOutcome> {
    let config = load_config(args)?;

    let manifest = config
        .policy
        .manifest
        .as_deref()
        .ok_or_else(|| invalid("policy.manifest", "no manifest given; pass --manifest or set policy.manifest"))?;
    let graph = load_graph(Path::new(manifest))?;

    let mut tiers = Vec::with_capacity(3);
    for (tier, path) in [
        (Tier::Foundation, &config.policy.foundation),
        (Tier::Platform, &config.policy.platform),
        (Tier::Product, &config.policy.product),
    ] {
        if let Some(path) = path {
            tiers.push((tier, PolicyDocument::from_path(Path::new(path), tier)?));
        }
    }
    if tiers.is_empty() {
        tracing::warn!("no policy tiers configured; only graph checks will apply");
    }

    let mut policy = InheritanceResolver::new().resolve(&tiers)?;
    if let Some(level) = &config.enforcement.level {
        let level = EnforcementLevel::from_str(level).map_err(|e| invalid("enforcement.level", e))?;
        policy = policy.with_requested_level(level)?;
    }

    let options = EnforcerOptions {
        include_downstream_impact: args.downstream_impact
            || config.enforcement.effective_include_downstream_impact(),
        ..Default::default()
    };
    let result = PolicyEnforcer::with_options(options).enforce(&graph, &policy);

    let format = ReportFormat::from_str(config.enforcement.effective_output_format())?;
    let report_path = ReportExporter::new().write_report(
        &result,
        format,
        Path::new(config.enforcement.effective_output_dir()),
    )?;

    Ok(EnforceOutcome { result, report_path })
}

/// One-line human summary for stdout.
pub fn summary_line(outcome: &EnforceOutcome) -> String {
    let r = &outcome.result;
    format!(
        "{} ({} level): {} models, {} errors, {} warnings, {} overrides applied; report: {}",
        if r.passed { "PASSED" } else { "FAILED" },
        r.enforcement_level,
        r.summary.total_models,
        r.summary.error_count,
        r.summary.warning_count,
        r.summary.overrides_applied,
        outcome.report_path.display()
    )
}

/// Map a run to the process exit status, printing the summary or the
/// fatal diagnostic.
pub fn exit_status(run: EnforceResult<EnforceOutcome>) -> u8 {
    match run {
        Ok(outcome) => {
            println!("{}", summary_line(&outcome));
            for warning in &outcome.result.policy_warnings {
                eprintln!("warning: {warning}");
            }
            outcome.exit_code()
        }
        Err(err) => {
            eprintln!("{}", fatal_diagnostic(&err));
            EXIT_FATAL
        }
    }
}

/// `error[CODE]: message`
pub fn fatal_diagnostic(err: &EnforceError) -> String {
    err.diagnostic()
}
