//! Descriptor resolution.
//!
//! Every function here is pure: it reads the [`BuildContext`] and returns a
//! value. Nothing touches the filesystem, so paths that do not exist are
//! reported later by the compiler or linker, with the full lists attached.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::{
  BOOST_SYSTEM_LIBRARY, ENGINE_LIBRARY, OS_INCLUDE_SUBPATH, RAPIDJSON_INCLUDE_SUBPATH, RAPIDJSON_STDSTRING_FLAG,
  ROOT_OVERRIDE_SUBPATH, ROOT_OVERRIDE_VAR, STD_FLAG,
};
use crate::context::BuildContext;
use crate::descriptor::{DataBundle, ExtensionDescriptor};

const CALCITE_JAR: &str = "calcite-1.0-SNAPSHOT-jar-with-dependencies.jar";

/// `environment[variable]/subpath` when the variable is set, `None` otherwise.
pub fn resolve_optional_root_override(
  environment: &BTreeMap<String, String>,
  variable: &str,
  subpath: &str,
) -> Option<PathBuf> {
  environment.get(variable).map(|root| Path::new(root).join(subpath))
}

fn engine_root_override(context: &BuildContext) -> Option<PathBuf> {
  resolve_optional_root_override(&context.environment, ROOT_OVERRIDE_VAR, ROOT_OVERRIDE_SUBPATH)
}

/// Header search path, highest precedence first.
pub fn build_include_dirs(context: &BuildContext) -> Vec<PathBuf> {
  let deps = &context.dependencies;
  let template = &context.template;

  [deps.numeric_include.clone(), deps.columnar_include.clone(), context.base_directory.clone()]
    .into_iter()
    .chain(template.include_roots().into_iter().map(Path::to_path_buf))
    .chain([
      template.source_dir.join(RAPIDJSON_INCLUDE_SUBPATH),
      template.source_dir.join(OS_INCLUDE_SUBPATH),
    ])
    .collect()
}

/// Link-time library search path. The environment override comes last so
/// libraries in the build tree win over the installed fallback.
pub fn build_library_dirs(context: &BuildContext) -> Vec<PathBuf> {
  context
    .dependencies
    .columnar_library_dirs
    .iter()
    .cloned()
    .chain([context.template.current_binary_dir.clone(), PathBuf::from(".")])
    .chain(engine_root_override(context))
    .collect()
}

/// Load-time library search path: columnar-format dirs, the relative marker
/// for the installed package, then the environment override.
pub fn build_runtime_library_dirs(context: &BuildContext) -> Vec<PathBuf> {
  context
    .dependencies
    .columnar_library_dirs
    .iter()
    .cloned()
    .chain([PathBuf::from(&context.runtime_marker)])
    .chain(engine_root_override(context))
    .collect()
}

/// Link names: the columnar-format libraries, then the engine and boost.
pub fn build_libraries(context: &BuildContext) -> Vec<String> {
  context
    .dependencies
    .columnar_libraries
    .iter()
    .cloned()
    .chain([ENGINE_LIBRARY.to_string(), BOOST_SYSTEM_LIBRARY.to_string()])
    .collect()
}

pub fn build_extra_flags() -> Vec<String> {
  vec![STD_FLAG.to_string(), RAPIDJSON_STDSTRING_FLAG.to_string()]
}

/// Compose the full descriptor. Total: an absent override is omitted.
pub fn resolve_descriptor(context: &BuildContext) -> ExtensionDescriptor {
  let descriptor = ExtensionDescriptor {
    module_name: context.extension.module_name.clone(),
    source_files: vec![context.extension.source.clone()],
    language_standard: context.extension.language.clone(),
    include_dirs: build_include_dirs(context),
    library_dirs: build_library_dirs(context),
    runtime_library_dirs: build_runtime_library_dirs(context),
    libraries: build_libraries(context),
    extra_flags: build_extra_flags(),
    // _GLIBCXX_USE_CXX11_ABI=0 is the known workaround for mismatched
    // libstdc++ ABIs; it is left to callers to add.
    macro_definitions: BTreeSet::new(),
  };

  debug!(
    module = %descriptor.module_name,
    include_dirs = descriptor.include_dirs.len(),
    library_dirs = descriptor.library_dirs.len(),
    runtime_library_dirs = descriptor.runtime_library_dirs.len(),
    root_override = context.environment.contains_key(ROOT_OVERRIDE_VAR),
    "resolved extension descriptor"
  );

  descriptor
}

/// Auxiliary files for fat packaging.
///
/// Empty unless `bundle_data` is set. Paths are listed, not checked: a missing
/// file fails the packaging step.
pub fn resolve_data_bundle(context: &BuildContext) -> DataBundle {
  if !context.bundle_data {
    return DataBundle::new();
  }

  let template = &context.template;
  let engine = template.engine_target_file.clone().unwrap_or_else(|| {
    template.current_binary_dir.join(format!(
      "{}{}{}",
      std::env::consts::DLL_PREFIX,
      ENGINE_LIBRARY,
      std::env::consts::DLL_SUFFIX
    ))
  });
  let query_engine = template.binary_dir.join("QueryEngine");

  DataBundle::new()
    .with_files("lib", [engine])
    .with_files("bin", [template.binary_dir.join("bin").join(CALCITE_JAR)])
    .with_files(
      "QueryEngine",
      [
        query_engine.join("RuntimeFunctions.bc"),
        query_engine.join("ExtensionFunctions.ast"),
      ],
    )
    .with_files(
      "include",
      [
        template.current_source_dir.join("DBEngine.h"),
        template.current_source_dir.join("DBEngine.pxd"),
      ],
    )
}
