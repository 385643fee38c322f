use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use runestone_core::{format_tree, Context as EngineContext, ContextFlags};

use crate::error::ErrorContext as EC;

pub struct FormatOutcome {
  pub original: String,
  pub formatted: String,
}

impl FormatOutcome {
  pub fn changed(&self) -> bool {
    self.original != self.formatted
  }
}

/// Reads `path`, runs it through the engine with the canonical rule
/// pipeline, and returns both the original and formatted text. Does not
/// write anything back — callers decide in-place/check/diff semantics.
pub fn format_path(path: &Path, flags: ContextFlags) -> Result<FormatOutcome> {
  let original = fs::read_to_string(path).context(EC::CannotReadFile(path.to_path_buf()))?;
  let tree = runestone_syntax::parse(&original).context(EC::CannotParseFile(path.to_path_buf()))?;
  let rules = runestone_rules::canonical_pipeline();
  let mut ctx = EngineContext::new(&original, tree, flags, rules);
  format_tree(&mut ctx).context(EC::EngineFailure(path.to_path_buf()))?;
  let formatted = String::from_utf8_lossy(ctx.fmt_io().as_bytes()).into_owned();
  Ok(FormatOutcome { original, formatted })
}

/// Writes the formatted text back to `path` in place, unless it is
/// byte-identical to what's already there.
pub fn write_in_place(path: &Path, outcome: &FormatOutcome) -> Result<()> {
  if !outcome.changed() {
    return Ok(());
  }
  fs::write(path, &outcome.formatted).context(EC::CannotWriteFile(path.to_path_buf()))?;
  Ok(())
}
