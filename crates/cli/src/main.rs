mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dbe_build_lib::consts::DEFAULT_CONFIG_FILE;

use crate::output::{OutputFormat, parse_key_val, print_error};

/// dbe-build - resolve build parameters for the embedded engine extension
#[derive(Parser)]
#[command(name = "dbe-build")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  format: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the resolved extension descriptor
  Resolve {
    /// Path to the setup config
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Setup script location; the repository root is two levels above it
    #[arg(long)]
    script: Option<PathBuf>,
  },

  /// Substitute @NAME@ and $<TARGET_FILE:name> tokens in a template
  Render {
    /// Template file
    template: PathBuf,

    /// Variable definition (NAME=VALUE), repeatable
    #[arg(short = 'D', long = "define", value_parser = parse_key_val)]
    vars: Vec<(String, String)>,

    /// Target file (NAME=PATH), repeatable
    #[arg(long = "target", value_parser = parse_key_val)]
    targets: Vec<(String, String)>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// Print cargo build-script link directives
  Cargo {
    /// Path to the setup config
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Setup script location; the repository root is two levels above it
    #[arg(long)]
    script: Option<PathBuf>,
  },

  /// Compile and package the extension with the configured toolchain
  Build {
    /// Path to the setup config
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Setup script location; the repository root is two levels above it
    #[arg(long)]
    script: Option<PathBuf>,
  },

  /// Show platform and environment information
  Info,
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if let Err(e) = run(cli) {
    print_error(&format!("{e:#}"));
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Resolve { config, script } => cmd::cmd_resolve(&config, script.as_deref(), cli.format),
    Commands::Render {
      template,
      vars,
      targets,
      output,
    } => cmd::cmd_render(&template, &vars, &targets, output.as_deref()),
    Commands::Cargo { config, script } => cmd::cmd_cargo(&config, script.as_deref()),
    Commands::Build { config, script } => cmd::cmd_build(&config, script.as_deref(), cli.format),
    Commands::Info => cmd::cmd_info(cli.format),
  }
}
