//! Implementation of the `dbe-build resolve` command.
//!
//! Prints the resolved extension descriptor and data bundle without running
//! any toolchain.

use std::path::Path;

use anyhow::{Context, Result};

use crate::output::{OutputFormat, print_info, print_json, print_paths, print_stat};

use super::load_plan;

pub fn cmd_resolve(config: &Path, script: Option<&Path>, format: OutputFormat) -> Result<()> {
  let (_, plan) = load_plan(config, script)?;
  let fingerprint = plan.fingerprint().context("Failed to fingerprint descriptor")?;

  if format.is_json() {
    let json = serde_json::json!({
      "fingerprint": fingerprint,
      "package": plan.package,
      "descriptor": plan.descriptor,
      "data_files": plan.data_bundle,
      "directives": plan.directives,
      "include_path": plan.include_path,
    });
    return print_json(&json);
  }

  let d = &plan.descriptor;
  print_info(&format!("{} {}", plan.package.name, plan.package.version));
  print_stat("Module", &d.module_name);
  print_stat("Language", &d.language_standard);
  print_stat("Fingerprint", &fingerprint.0);
  println!();
  print_paths("Sources", &d.source_files);
  print_paths("Include dirs", &d.include_dirs);
  print_paths("Library dirs", &d.library_dirs);
  print_paths("Runtime library dirs", &d.runtime_library_dirs);
  println!("Libraries: {}", d.libraries.join(" "));
  println!("Flags: {}", d.extra_flags.join(" "));

  if plan.data_bundle.is_empty() {
    print_stat("Data files", "none (bundle_data = false)");
  } else {
    for entry in plan.data_bundle.iter() {
      print_paths(&format!("Data files -> {}", entry.destination), &entry.files);
    }
  }

  Ok(())
}
