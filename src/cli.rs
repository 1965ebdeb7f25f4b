use crate::document::Format;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "extendext",
    about = "Merge JSON/TOML documents deeply or shallowly with selectable array handling",
    long_about = "extendext merges a target document with one or more source documents.

Sources are applied left to right, so later sources win on conflicting keys.

Array modes control how two arrays at the same position combine:
  • default: merge index by index, like objects
  • concat:  append the source's elements to the target's
  • replace: take the source's elements, discarding the target's
  • extend:  merge object elements by index, append new scalar values

Defaults for --deep and --array-mode can be set in:
  • $XDG_CONFIG_HOME/extendext/config.toml (or ~/.config/extendext/config.toml)",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug output (shows INFO and DEBUG messages)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Enable trace output (shows all log messages including TRACE)
    #[arg(short = 't', long, global = true)]
    pub trace: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge source documents into a target document
    #[command(long_about = "Merge source documents into a target document.

Files ending in .toml are read as TOML, everything else as JSON.
The result is printed to stdout unless --output is given.

Examples:
  # Deep merge an override into a base config
  extendext merge --deep base.json override.json

  # Concatenate arrays and write the result to a file
  extendext merge --deep --array-mode concat base.json extra.json -o merged.json

  # Preview what would be written
  extendext merge --deep base.toml local.toml -o app.toml --dry-run")]
    Merge(MergeArgs),

    /// Inspect the extendext configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Target document the sources are merged into
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub target: PathBuf,

    /// Source documents, applied in order
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub sources: Vec<PathBuf>,

    /// Recurse into nested objects and arrays, copying them
    #[arg(long, conflicts_with = "shallow")]
    pub deep: bool,

    /// Assign nested values as they are (overrides a configured default)
    #[arg(long)]
    pub shallow: bool,

    /// Array mode: default, concat, replace or extend (case-insensitive)
    #[arg(short = 'm', long, env = "EXTENDEXT_ARRAY_MODE")]
    pub array_mode: Option<String>,

    /// Output format (defaults to the output file's extension, else JSON)
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// Write the result to this file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Create timestamped backup of the output file before overwriting it
    #[arg(short, long, requires = "output")]
    pub backup: bool,

    /// Preview changes without writing them
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective default merge options
    Show,
    /// Print the configuration file path
    Path,
}
