use ansi_term::{Color, Style};
use anyhow::{Error, Result};

use std::fmt;
use std::path::PathBuf;

/// Command-line usage errors. Provides the abstraction around exit code,
/// message, and a help line, the way the engine's own `EngineError` never
/// does (that one is a library error, this one is user-facing).
#[derive(Debug, Clone)]
pub enum ErrorContext {
  CannotReadFile(PathBuf),
  CannotWriteFile(PathBuf),
  CannotParseFile(PathBuf),
  EngineFailure(PathBuf),
  CannotReadConfig(PathBuf),
}

impl ErrorContext {
  fn exit_code(&self) -> i32 {
    use ErrorContext::*;
    match self {
      CannotReadFile(_) | CannotWriteFile(_) => 2,
      _ => 1,
    }
  }

  fn message(&self) -> (String, String) {
    use ErrorContext::*;
    match self {
      CannotReadFile(p) => (
        format!("Cannot read {}.", p.display()),
        "Check the path exists and is readable.".to_string(),
      ),
      CannotWriteFile(p) => (
        format!("Cannot write {}.", p.display()),
        "Check the path is writable and not a directory.".to_string(),
      ),
      CannotParseFile(p) => (
        format!("Cannot parse {}.", p.display()),
        "runestone only formats input that already parses; fix the syntax error first."
          .to_string(),
      ),
      EngineFailure(p) => (
        format!("Formatting engine failed on {}.", p.display()),
        "This indicates an engine or rule bug; please file an issue.".to_string(),
      ),
      CannotReadConfig(p) => (
        format!("Cannot read configuration at {}.", p.display()),
        "Check the file is valid YAML matching the runestone config schema.".to_string(),
      ),
    }
  }
}

impl fmt::Display for ErrorContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.message().0)
  }
}

impl std::error::Error for ErrorContext {}

pub fn exit_with_error(error: Error) -> Result<()> {
  if let Some(e) = error.downcast_ref::<clap::Error>() {
    e.exit()
  }
  if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
    let (title, help) = ctx.message();
    eprintln!("{} {}", Color::Red.paint("Error:"), Style::new().bold().paint(title));
    eprintln!("{} {}", Color::Blue.paint("Help:"), help);
    for err in error.chain().skip(1) {
      eprintln!("{} {}", Color::Red.paint("caused by:"), err);
    }
    std::process::exit(ctx.exit_code())
  }
  Err(error)
}
