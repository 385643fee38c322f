use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ErrorContext as EC;

/// Default flag values read from `runestone.yml`, overridden by whatever the
/// caller actually passed on the command line. Excludes `quiet`/`check`/
/// `diff`, which only make sense as run-time choices.
#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RunestoneConfig {
  #[serde(default)]
  pub assert: bool,
  #[serde(default)]
  pub verbose: bool,
}

pub fn load_config(path: Option<&Path>) -> Result<RunestoneConfig> {
  let Some(path) = path else {
    return Ok(RunestoneConfig::default());
  };
  let text = read_to_string(path).context(EC::CannotReadConfig(path.to_path_buf()))?;
  serde_yaml::from_str(&text).context(EC::CannotReadConfig(path.to_path_buf()))
}

/// `runestone.yml` in the current directory, if present — used only when
/// `--config` was not passed explicitly.
pub fn default_config_path() -> Option<PathBuf> {
  let candidate = PathBuf::from("runestone.yml");
  candidate.is_file().then_some(candidate)
}
