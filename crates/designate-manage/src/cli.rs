//! Command-line interface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Designate management commands.
#[derive(Debug, Parser)]
#[command(name = "designate-manage", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML or JSON).
    #[arg(long, short = 'c', global = true, env = "DESIGNATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import TLDs from a delimited file of `name[,description]` lines.
    ImportTlds(ImportTldsArgs),
}

/// Arguments of `import-tlds`.
#[derive(Debug, Args)]
pub struct ImportTldsArgs {
    /// Input file path containing TLDs.
    #[arg(long)]
    pub input_file: PathBuf,

    /// Delimiter between fields in the input file.
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Base URL of the DNS API. Required unless `--dry-run` is given.
    #[arg(long, env = "DESIGNATE_ENDPOINT", required_unless_present = "dry_run")]
    pub endpoint: Option<String>,

    /// Token sent as `X-Auth-Token`.
    #[arg(long, env = "DESIGNATE_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Validate the file against an empty in-memory store instead of the API.
    #[arg(long)]
    pub dry_run: bool,
}
