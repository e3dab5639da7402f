mod build;
mod cargo;
mod info;
mod render;
mod resolve;

pub use build::cmd_build;
pub use cargo::cmd_cargo;
pub use info::cmd_info;
pub use render::cmd_render;
pub use resolve::cmd_resolve;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use dbe_build_lib::config::SetupConfig;
use dbe_build_lib::context::normalize_lexically;
use dbe_build_lib::setup::{SetupPlan, prepare};

/// Load the config and resolve a plan.
///
/// The repository root is two levels above `script`; without one, the config
/// file stands in for the setup script it was rendered next to.
pub(crate) fn load_plan(config: &Path, script: Option<&Path>) -> Result<(SetupConfig, SetupPlan)> {
  let setup = SetupConfig::load(config)?;

  let script: PathBuf = match script {
    Some(path) => std::path::absolute(path)
      .map(|p| normalize_lexically(&p))
      .with_context(|| format!("Invalid script path: {}", path.display()))?,
    None => dunce::canonicalize(config).with_context(|| format!("Failed to resolve {}", config.display()))?,
  };

  let plan = prepare(&setup, &script).context("Failed to resolve build parameters")?;
  Ok((setup, plan))
}
