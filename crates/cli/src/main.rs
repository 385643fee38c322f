mod config;
mod error;
mod format;
mod utils;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::Parser;
use ignore::WalkBuilder;
use runestone_core::ContextFlags;
use tracing::{debug, info};

use crate::error::exit_with_error;
use crate::format::{format_path, write_in_place};
use crate::utils::{print_diff, DiffStyles};

/// runestone: tree-rewriting formatter for a Julia-flavored surface syntax.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
  /// Files or directories to format. Directories are walked recursively
  /// for `.jl` files.
  paths: Vec<PathBuf>,

  /// Check formatting without writing; exit nonzero if anything would change.
  #[clap(long)]
  check: bool,

  /// Print a diff instead of writing.
  #[clap(long)]
  diff: bool,

  /// Suppress per-file output.
  #[clap(short, long)]
  quiet: bool,

  /// Verbose logging.
  #[clap(short, long)]
  verbose: bool,

  /// Enable extra engine invariant checks and verbose logging.
  #[clap(long)]
  debug: bool,

  /// Path to a `runestone.yml` config file. Defaults to `./runestone.yml`
  /// if present.
  #[clap(long)]
  config: Option<PathBuf>,
}

fn main() -> ExitCode {
  match run() {
    Ok(found_diff) => {
      if found_diff {
        ExitCode::FAILURE
      } else {
        ExitCode::SUCCESS
      }
    }
    Err(e) => match exit_with_error(e) {
      Ok(()) => ExitCode::SUCCESS,
      Err(_) => ExitCode::FAILURE,
    },
  }
}

fn run() -> Result<bool> {
  let cli = Cli::parse();
  init_tracing(cli.verbose || cli.debug);

  let config_path = cli.config.clone().or_else(config::default_config_path);
  let file_config = config::load_config(config_path.as_deref())?;

  let flags = ContextFlags::new(
    cli.quiet,
    cli.verbose || file_config.verbose,
    cli.assert_flag() || file_config.assert,
    cli.debug,
    cli.check,
    cli.diff,
  );

  if cli.paths.is_empty() {
    return Err(anyhow!("no paths given; pass one or more files or directories"));
  }

  let styles = if std::env::var_os("NO_COLOR").is_some() {
    DiffStyles::no_color()
  } else {
    DiffStyles::colored()
  };
  let mut found_diff = false;

  for file in collect_files(&cli.paths) {
    debug!(path = %file.display(), "formatting");
    let outcome = format_path(&file, flags)?;
    if !outcome.changed() {
      continue;
    }
    found_diff = true;
    if cli.diff {
      let mut stdout = std::io::stdout();
      print_diff(&styles, &file.display().to_string(), &outcome.original, &outcome.formatted, &mut stdout)?;
    } else if cli.check {
      if !cli.quiet {
        println!("would reformat {}", file.display());
      }
    } else {
      write_in_place(&file, &outcome)?;
      if !cli.quiet {
        info!(path = %file.display(), "reformatted");
        println!("reformatted {}", file.display());
      }
    }
  }

  Ok(found_diff && cli.check)
}

impl Cli {
  fn assert_flag(&self) -> bool {
    self.debug
  }
}

fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
  let mut files = Vec::new();
  for path in paths {
    if path.is_dir() {
      for entry in WalkBuilder::new(path).build() {
        let Ok(entry) = entry else { continue };
        let is_jl = entry.path().extension().is_some_and(|ext| ext == "jl");
        if entry.file_type().is_some_and(|t| t.is_file()) && is_jl {
          files.push(entry.into_path());
        }
      }
    } else {
      files.push(path.clone());
    }
  }
  files
}

fn init_tracing(verbose: bool) {
  use tracing_subscriber::EnvFilter;
  let level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
  let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
