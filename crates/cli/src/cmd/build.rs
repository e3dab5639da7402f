//! Implementation of the `dbe-build build` command.
//!
//! Resolves the descriptor, then drives the configured toolchain through the
//! compile and package steps.

use std::path::Path;

use anyhow::{Result, bail};

use dbe_build_lib::setup::run_setup;

use crate::output::{OutputFormat, print_json, print_stat, print_success, print_warning};

use super::load_plan;

pub fn cmd_build(config: &Path, script: Option<&Path>, format: OutputFormat) -> Result<()> {
  let (setup, plan) = load_plan(config, script)?;

  let Some(toolchain) = setup.toolchain.as_ref() else {
    bail!("No [toolchain] configured in {}", config.display());
  };

  if !plan.data_bundle.is_empty() {
    print_warning("bundle_data is enabled; engine artifacts will be packaged with the module");
  }

  let outcome = run_setup(&plan, toolchain).map_err(dbe_build_lib::Error::from)?;

  if format.is_json() {
    return print_json(&outcome);
  }

  print_success(&format!("Built {} {}", outcome.package.name, outcome.package.version));
  for module in &outcome.modules {
    print_stat(&module.name, &module.path.display().to_string());
  }
  Ok(())
}
