//! netdrift: cloud network topology snapshots and drift detection

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use netdrift::{
    cli::{self, DiffOptions, ScanOptions},
    config::{self, resolve_region, AppConfig, Validatable},
    model::Scope,
    reports::ReportFormat,
    watch::{parse_duration, AlertFormat, WatchConfig},
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "netdrift")]
#[command(version)]
#[command(about = "Snapshot, diff and watch cloud network topology", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  No drift detected
    1  Drift detected (diff --fail-on-change)
    2  Error occurred

EXAMPLES:
    # Capture a baseline
    netdrift scan --inventory inventory.json --save-state

    # Render the topology as a Graphviz graph
    netdrift scan --inventory inventory.json -o dot | dot -Tsvg > network.svg

    # Watch for drift every five minutes
    netdrift watch --inventory inventory.json -i 5m

    # Compare two saved states in CI
    netdrift diff working_state.json current.json --fail-on-change")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Flags accepted by every subcommand
#[derive(Parser)]
struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Arguments shared by commands that acquire an inventory
#[derive(Parser)]
struct ScopeArgs {
    /// Inventory document to read (JSON)
    #[arg(long)]
    inventory: Option<PathBuf>,

    /// Region to scan (falls back to config, then `AWS_REGION`, then us-east-1)
    #[arg(short, long)]
    region: Option<String>,

    /// Restrict the scan to a single VPC
    #[arg(long)]
    vpc_id: Option<String>,
}

/// Arguments for the `scan` subcommand
#[derive(Parser)]
struct ScanArgs {
    #[command(flatten)]
    scope: ScopeArgs,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<ReportFormat>,

    /// Export the snapshot to a JSON file
    #[arg(long)]
    export_json: Option<PathBuf>,

    /// Save the snapshot to working_state.json
    #[arg(long)]
    save_state: bool,
}

/// Arguments for the `watch` subcommand
#[derive(Parser)]
struct WatchArgs {
    #[command(flatten)]
    scope: ScopeArgs,

    /// Baseline working state file
    #[arg(short = 'f', long = "state-file")]
    state_file: Option<PathBuf>,

    /// Polling interval (e.g. 30s, 5m, 1h)
    #[arg(short, long)]
    interval: Option<String>,

    /// Alert format
    #[arg(long, value_enum)]
    output: Option<AlertFormat>,

    /// Append NDJSON alerts to a file
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Exit after the first cycle that finds differences (CI mode)
    #[arg(long)]
    exit_on_change: bool,
}

/// Arguments for the `diff` subcommand
#[derive(Parser)]
struct DiffArgs {
    /// Baseline working state
    baseline: PathBuf,

    /// Current working state
    current: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = AlertFormat::Summary)]
    output: AlertFormat,

    /// Exit with code 1 if any differences are found
    #[arg(long)]
    fail_on_change: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the network inventory and render its topology
    Scan(ScanArgs),

    /// Periodically compare the live inventory against a saved baseline
    Watch(WatchArgs),

    /// Compare two saved working states
    Diff(DiffArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .netdrift.yaml in the current directory
    Init,
}

/// Load the config file and layer the global flags over it.
fn load_config(global: &GlobalArgs) -> Result<AppConfig> {
    let overrides = AppConfig::builder()
        .verbose(global.verbose)
        .quiet(global.quiet)
        .no_color(global.no_color)
        .build();
    let (config, loaded_from) =
        AppConfig::from_file_with_overrides(global.config.as_deref(), &overrides);
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }

    config.ensure_valid()?;
    Ok(config)
}

/// Resolve scope and inventory path from flags over config.
fn resolve_scope(args: ScopeArgs, config: &AppConfig) -> Result<(Scope, PathBuf)> {
    let region = resolve_region(args.region.as_deref(), config.scan.region.as_deref());
    let mut scope = Scope::new(region);
    if let Some(vpc_id) = args.vpc_id.or_else(|| config.scan.vpc_id.clone()) {
        scope = scope.with_vpc(vpc_id);
    }
    let inventory = args
        .inventory
        .or_else(|| config.scan.inventory.clone())
        .context("no inventory document given; pass --inventory or set scan.inventory")?;
    Ok((scope, inventory))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.global.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    if let Err(e) = dispatch(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(cli::exit_codes::ERROR);
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Commands::Scan(args) => run_scan_command(args, &load_config(&global)?).await,
        Commands::Watch(args) => run_watch_command(args, &load_config(&global)?).await,
        Commands::Diff(args) => run_diff_command(args, &load_config(&global)?),

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "netdrift", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = config::generate_json_schema().context("failed to generate schema")?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) = config::load_or_default(global.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml =
                    serde_yaml_ng::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                eprintln!("Config file search paths (in order):");
                for dir in config::config_search_dirs() {
                    eprintln!("  {}", dir.display());
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in config::CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match config::discover_config_file(global.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".netdrift.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                std::fs::write(&target, config::generate_example_config())
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
        },
    }
}

async fn run_scan_command(args: ScanArgs, config: &AppConfig) -> Result<()> {
    let (scope, inventory) = resolve_scope(args.scope, config)?;
    cli::run_scan(ScanOptions {
        inventory,
        scope,
        output: args.output.unwrap_or(config.scan.output),
        export_json: args.export_json,
        save_state: args.save_state,
        verbose: config.behavior.verbose,
    })
    .await
}

async fn run_watch_command(args: WatchArgs, config: &AppConfig) -> Result<()> {
    let (scope, inventory) = resolve_scope(args.scope, config)?;
    let interval_str = args.interval.as_deref().unwrap_or(&config.watch.interval);
    let interval = parse_duration(interval_str)?;
    let baseline = args.state_file.unwrap_or_else(|| config.watch.baseline.clone());

    let behavior = &config.behavior;
    let mut watch_config = WatchConfig::new(scope)
        .with_baseline(baseline)
        .with_interval(interval);
    watch_config.verbose = behavior.verbose;
    watch_config.quiet = behavior.quiet;
    watch_config.no_color = behavior.no_color;
    watch_config.exit_on_change = args.exit_on_change || config.watch.exit_on_change;
    watch_config.alert_format = args.output.unwrap_or(config.watch.alert_format);
    watch_config.alert_file = args.output_file.or_else(|| config.watch.alert_file.clone());
    watch_config.ignore_fields.clone_from(&config.diff.ignore_fields);

    cli::run_watch(watch_config, &inventory).await?;
    Ok(())
}

fn run_diff_command(args: DiffArgs, config: &AppConfig) -> Result<()> {
    let exit_code = cli::run_diff(DiffOptions {
        baseline: args.baseline,
        current: args.current,
        output: args.output,
        fail_on_change: args.fail_on_change,
        ignore_fields: config.diff.ignore_fields.clone(),
        colored: !config.behavior.no_color,
        verbose: config.behavior.verbose,
    })?;
    if exit_code != cli::exit_codes::SUCCESS {
        std::process::exit(exit_code);
    }
    Ok(())
}
