mod config;

use aliasfix_core::FsTreeView;
use aliasfix_core::adapters::FsWritePort;
use aliasfix_core::pipeline::{ToolError, lookup, run_fs, write_report_artifacts};
use aliasfix_core::settings::RunSettings;
use aliasfix_render::{render_lookup, render_summary_line, render_trail};
use aliasfix_types::ToolInfo;
use aliasfix_types::reference::AliasLookup;
use aliasfix_types::report::PassMode;
use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use config::{CliOverrides, ConfigMerger, MergedConfig};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "aliasfix",
    version,
    about = "Verify alias-rooted import paths and repair the ones that no longer resolve."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report broken alias imports and preview the repairs, without writing.
    Check(CheckArgs),
    /// Repair broken alias imports in place.
    Fix(PassArgs),
    /// Show whether one alias resolves, and how it would be repaired if not.
    Resolve(ResolveArgs),
}

#[derive(Debug, Args)]
struct TreeArgs {
    /// Project root holding aliasfix.toml (default: current directory).
    #[arg(long, default_value = ".")]
    project_root: Utf8PathBuf,

    /// Directory the alias marker maps to (default: `source_root` from aliasfix.toml, else src).
    #[arg(long)]
    source_root: Option<Utf8PathBuf>,

    /// Alias marker prefix, e.g. "@/".
    #[arg(long)]
    marker: Option<String>,

    /// Additional directory names to skip while walking.
    #[arg(long)]
    exclude: Vec<String>,
}

#[derive(Debug, Args)]
struct PassArgs {
    #[command(flatten)]
    tree: TreeArgs,

    /// Write the JSON report (aliasfix.report.v1) to this path.
    #[arg(long)]
    report: Option<Utf8PathBuf>,

    /// Write a markdown summary to this path.
    #[arg(long)]
    markdown: Option<Utf8PathBuf>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    #[command(flatten)]
    pass: PassArgs,

    /// Omit the unified diff of pending repairs.
    #[arg(long, default_value_t = false)]
    no_diff: bool,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    /// The alias to look up, e.g. "@/shared/helpers/formatCurrency".
    alias: String,

    #[command(flatten)]
    tree: TreeArgs,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(()) => ExitCode::from(0),
        Err(ToolError::PolicyBlock) => ExitCode::from(2),
        Err(ToolError::Internal(e)) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> Result<(), ToolError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_pass(args.pass, PassMode::Check, !args.no_diff),
        Command::Fix(args) => cmd_pass(args, PassMode::Fix, false),
        Command::Resolve(args) => cmd_resolve(args),
    }
}

fn cmd_pass(args: PassArgs, mode: PassMode, show_diff: bool) -> Result<(), ToolError> {
    let merged = merged_config(&args.tree)?;
    let settings = RunSettings {
        source_root: merged.source_root,
        mode,
        config: merged.alias,
    };
    debug!(
        "run settings: source_root={}, mode={:?}, marker={}, exclude={:?}",
        settings.source_root, settings.mode, settings.config.marker, settings.config.exclude_dirs
    );

    let outcome = run_fs(&settings, tool_info())?;

    print!("{}", render_trail(&outcome.report));
    if show_diff && !outcome.patch.is_empty() {
        println!();
        print!("{}", outcome.patch);
    }
    println!("{}", render_summary_line(&outcome.report));

    write_report_artifacts(
        &outcome,
        args.report.as_deref(),
        args.markdown.as_deref(),
        &FsWritePort,
    )
    .context("write report artifacts")?;

    if outcome.policy_block {
        return Err(ToolError::PolicyBlock);
    }
    Ok(())
}

fn cmd_resolve(args: ResolveArgs) -> Result<(), ToolError> {
    let merged = merged_config(&args.tree)?;
    if !merged.source_root.is_dir() {
        return Err(
            anyhow::anyhow!("source root {} is not a directory", merged.source_root).into(),
        );
    }

    let tree = FsTreeView::new(merged.source_root.clone());
    let result = lookup(&args.alias, &tree, &merged.alias)
        .with_context(|| format!("look up {}", args.alias))?;
    print!("{}", render_lookup(&args.alias, &result));

    match result {
        AliasLookup::Resolved => Ok(()),
        AliasLookup::Broken { .. } => Err(ToolError::PolicyBlock),
    }
}

fn merged_config(tree: &TreeArgs) -> anyhow::Result<MergedConfig> {
    let file_config =
        config::load_or_default(&tree.project_root).context("load aliasfix.toml config")?;
    let cli = CliOverrides {
        source_root: tree.source_root.as_deref(),
        marker: tree.marker.as_deref(),
        exclude: &tree.exclude,
    };
    Ok(ConfigMerger::new(file_config).merge(&tree.project_root, &cli))
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "aliasfix".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        commit: None,
    }
}
