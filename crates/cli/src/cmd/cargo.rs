//! Implementation of the `dbe-build cargo` command.
//!
//! Emits `cargo:` directives so a Rust build script can link against the
//! engine with the resolved search paths.

use std::path::Path;

use anyhow::Result;

use dbe_build_lib::cargo::directives;

use super::load_plan;

pub fn cmd_cargo(config: &Path, script: Option<&Path>) -> Result<()> {
  let (_, plan) = load_plan(config, script)?;
  for line in directives(&plan.descriptor) {
    println!("{line}");
  }
  Ok(())
}
