//! aggregate-types CLI
//!
//! Entry point for the `aggregate-types` command-line tool. Without a
//! subcommand it behaves like `run`.

use clap::{Args, Parser, Subcommand};
use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::process;
use types_aggregator::config::DEFAULT_CONFIG_FILE;
use types_aggregator::{pipeline, AggregatorConfig, ConfigOverrides, EffectiveConfig};

#[derive(Parser)]
#[command(name = "aggregate-types")]
#[command(about = "Merge per-module types.json files and convert the result", version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct GlobalArgs {
    /// Path to config file (default: aggregate-types.toml, if present)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Common root of the source directories (default: ..)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Source identifier, repeatable; replaces the configured list
    #[arg(long = "source", short = 's', global = true)]
    sources: Vec<String>,

    /// Aggregate output, relative to root (default: types.json)
    #[arg(long, short = 'o', global = true)]
    output: Option<PathBuf>,

    /// Converter output, relative to root (default: types_mapping.json)
    #[arg(long, global = true)]
    mapping_output: Option<PathBuf>,

    /// Skip the conversion step
    #[arg(long, global = true)]
    no_convert: bool,

    /// Log debug details, including identical redefinitions
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate, write types.json and run the converter (default)
    Run,

    /// Aggregate and report sources and collisions without writing
    Check {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration with provenance
    Config,
}

fn main() {
    let cli = Cli::parse();

    init_logger(&cli.global);

    let effective = match load_config(&cli.global) {
        Ok(effective) => effective,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_aggregate(&effective.config),
        Commands::Check { json } => run_check(&effective.config, json),
        Commands::Config => run_show_config(&effective),
    }
}

fn init_logger(global: &GlobalArgs) {
    let level = if global.quiet {
        LevelFilter::Error
    } else if global.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if let Err(e) = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialise logger: {}", e);
    }
}

fn load_config(global: &GlobalArgs) -> Result<EffectiveConfig, types_aggregator::ConfigError> {
    let overrides = ConfigOverrides {
        root: global.root.clone(),
        sources: global.sources.clone(),
        output: global.output.clone(),
        mapping_output: global.mapping_output.clone(),
        no_convert: global.no_convert,
    };

    // An explicit --config must exist; the default file is optional
    let (path, required) = match global.config {
        Some(ref path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    EffectiveConfig::build(Some(&path), required, overrides.to_value())
}

fn run_aggregate(config: &AggregatorConfig) {
    match pipeline::run(config) {
        Ok(outcome) => {
            info!(
                "Done: {} keys, {} ({})",
                outcome.total_keys,
                outcome.output.display(),
                outcome.output_digest
            );
        }
        Err(e) => {
            error!("{}", e);
            process::exit(e.exit_code());
        }
    }
}

fn run_check(config: &AggregatorConfig, json_output: bool) {
    let report = match pipeline::check(config) {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            process::exit(e.exit_code());
        }
    };

    if json_output {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{}", report.to_human());
    }
}

fn run_show_config(effective: &EffectiveConfig) {
    match effective.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}
