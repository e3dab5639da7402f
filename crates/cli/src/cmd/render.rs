//! Implementation of the `dbe-build render` command.
//!
//! Fills `@NAME@` and `$<TARGET_FILE:name>` tokens in a template, standing in
//! for the configure step of the outer build system.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use dbe_build_lib::placeholder::{VarResolver, substitute};

use crate::output::print_success;

pub fn cmd_render(
  template: &Path,
  vars: &[(String, String)],
  targets: &[(String, String)],
  output: Option<&Path>,
) -> Result<()> {
  let content =
    fs::read_to_string(template).with_context(|| format!("Failed to read template: {}", template.display()))?;

  let resolver = vars
    .iter()
    .fold(VarResolver::new(), |r, (name, value)| r.with_var(name, value));
  let resolver = targets
    .iter()
    .fold(resolver, |r, (target, file)| r.with_target(target, file));

  debug!(vars = vars.len(), targets = targets.len(), "rendering template");
  let rendered = substitute(&content, &resolver)
    .map_err(dbe_build_lib::Error::from)
    .with_context(|| format!("Failed to render {}", template.display()))?;

  match output {
    Some(path) => {
      fs::write(path, rendered).with_context(|| format!("Failed to write {}", path.display()))?;
      print_success(&format!("Rendered {}", path.display()));
    }
    None => print!("{rendered}"),
  }

  Ok(())
}
