//! Rendering a descriptor as Cargo build-script directives.
//!
//! Lets a Rust crate link against the engine with the same search paths the
//! wrapper module uses: call [`directives`] from `build.rs` and print each
//! line.

use crate::consts::ROOT_OVERRIDE_VAR;
use crate::descriptor::ExtensionDescriptor;

pub fn directives(descriptor: &ExtensionDescriptor) -> Vec<String> {
  let search = descriptor
    .library_dirs
    .iter()
    .map(|dir| format!("cargo:rustc-link-search=native={}", dir.display()));
  let libs = descriptor
    .libraries
    .iter()
    .map(|lib| format!("cargo:rustc-link-lib={lib}"));
  let rpaths = descriptor
    .runtime_library_dirs
    .iter()
    .map(|dir| format!("cargo:rustc-link-arg=-Wl,-rpath,{}", dir.display()));

  search
    .chain(libs)
    .chain(rpaths)
    .chain([format!("cargo:rerun-if-env-changed={ROOT_OVERRIDE_VAR}")])
    .collect()
}
