use anyhow::Result;

use dbe_build_lib::consts::ROOT_OVERRIDE_VAR;
use dbe_build_lib::platform::{Os, host_runtime_marker};

use crate::output::{OutputFormat, print_json, print_stat};

pub fn cmd_info(format: OutputFormat) -> Result<()> {
  let os = Os::current();
  let root = std::env::var(ROOT_OVERRIDE_VAR).ok();

  if format.is_json() {
    return print_json(&serde_json::json!({
      "version": env!("CARGO_PKG_VERSION"),
      "os": os,
      "runtime_marker": host_runtime_marker(),
      "root_override": root,
    }));
  }

  println!("System:");
  match os {
    Some(os) => print_stat("OS", os.as_str()),
    None => print_stat("OS", "unsupported"),
  }
  print_stat("Runtime marker", host_runtime_marker());
  print_stat(ROOT_OVERRIDE_VAR, root.as_deref().unwrap_or("(not set)"));
  Ok(())
}
