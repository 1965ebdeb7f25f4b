#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use extendext::{
    app_config::AppConfig,
    cli::{Cli, Commands, ConfigCommands, MergeArgs},
    document::{reader, writer, Format},
    merge, ArrayMode, MergeOptions,
};
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(cli.debug, cli.trace);

    let app_config = load_and_log_config()?;

    dispatch_command(cli.command, app_config.as_ref())
}

/// Initialize tracing with the specified debug/trace flags
fn initialize_tracing(debug: bool, trace: bool) {
    let log_level = if trace {
        Level::TRACE
    } else if debug {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::builder().with_default_directive(log_level.into()).from_env_lossy())
        .init();
}

/// Load application configuration and log its status
fn load_and_log_config() -> Result<Option<AppConfig>> {
    let app_config = AppConfig::load().context("Failed to load app configuration")?;

    if app_config.is_some() {
        debug!("Loaded app configuration from: {}", AppConfig::config_path()?.display());
    } else {
        debug!("No app configuration file found at: {}", AppConfig::config_path()?.display());
    }

    Ok(app_config)
}

fn dispatch_command(command: Commands, app_config: Option<&AppConfig>) -> Result<()> {
    match command {
        Commands::Merge(args) => run_merge(args, app_config),
        Commands::Config(ConfigCommands::Show) => run_config_show(app_config),
        Commands::Config(ConfigCommands::Path) => {
            println!("{}", AppConfig::config_path()?.display());
            Ok(())
        },
    }
}

/// Command-line flags take precedence over the configured defaults
fn effective_options(args: &MergeArgs, app_config: Option<&AppConfig>) -> MergeOptions {
    let configured = app_config.map(AppConfig::merge_options).unwrap_or_default();

    let deep = if args.deep {
        true
    } else if args.shallow {
        false
    } else {
        configured.deep
    };

    let array_mode =
        args.array_mode.as_deref().map_or(configured.array_mode, ArrayMode::parse_lenient);

    MergeOptions::new(deep, array_mode)
}

fn run_merge(args: MergeArgs, app_config: Option<&AppConfig>) -> Result<()> {
    let options = effective_options(&args, app_config);
    debug!("Merging with deep={}, array_mode={}", options.deep, options.array_mode);

    let target = reader::read_structure(&args.target)?;
    let sources = reader::read_structures(&args.sources)?;
    let merged = merge(options, target, &sources);

    let format = args
        .format
        .or_else(|| args.output.as_deref().map(Format::from_path))
        .unwrap_or_else(|| Format::from_path(&args.target));

    let Some(output) = args.output else {
        print!("{}", writer::render_structure(&merged, format)?);
        return Ok(());
    };

    if args.dry_run {
        println!("Would write to {}:", output.display());
        print!("{}", writer::render_structure(&merged, format)?);
        return Ok(());
    }

    if args.backup {
        match writer::backup_file(&output)
            .with_context(|| format!("Failed to back up {}", output.display()))?
        {
            Some(backup_path) => info!("Backup created: {backup_path}"),
            None => debug!("No backup needed (file doesn't exist)"),
        }
    }

    writer::write_structure(&output, &merged, format)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Merged {} source(s) into {}", sources.len(), output.display());

    Ok(())
}

fn run_config_show(app_config: Option<&AppConfig>) -> Result<()> {
    let options = app_config.map(AppConfig::merge_options).unwrap_or_default();
    let path = AppConfig::config_path()?;

    if app_config.is_some() {
        println!("Configuration: {}", path.display());
    } else {
        println!("Configuration: {} (not found, using built-in defaults)", path.display());
    }
    println!("deep = {}", options.deep);
    println!("array-mode = {}", options.array_mode);

    let modes: Vec<&str> = ArrayMode::ALL.iter().map(|mode| mode.as_str()).collect();
    println!("available array modes: {}", modes.join(", "));

    Ok(())
}
