//! Inputs to descriptor resolution.
//!
//! A [`BuildContext`] is assembled once at start-up from the setup config, the
//! probed dependency locations, and a snapshot of the process environment.
//! Resolution reads it and never writes to it.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::{DEFAULT_LANGUAGE, DEFAULT_MODULE_NAME, ROOT_OVERRIDE_VAR};
use crate::platform::host_runtime_marker;

/// Fixed paths filled in by the outer build system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRoots {
  /// Top of the engine source tree.
  pub source_dir: PathBuf,
  /// Source directory of the embedding wrapper.
  pub current_source_dir: PathBuf,
  /// Build directory of the embedding wrapper; the engine library lands here.
  pub current_binary_dir: PathBuf,
  /// Top of the build tree.
  pub binary_dir: PathBuf,
  /// Built engine library, when the build system reports it.
  #[serde(default)]
  pub engine_target_file: Option<PathBuf>,
}

impl TemplateRoots {
  /// Source and build roots searched for headers, in precedence order.
  pub fn include_roots(&self) -> [&Path; 2] {
    [self.source_dir.as_path(), self.current_source_dir.as_path()]
  }
}

/// Locations reported by the numeric-array and columnar-format libraries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyPaths {
  pub numeric_include: PathBuf,
  pub columnar_include: PathBuf,
  #[serde(default)]
  pub columnar_library_dirs: Vec<PathBuf>,
  #[serde(default)]
  pub columnar_libraries: Vec<String>,
}

/// What is being built: module name, wrapper source and language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionSettings {
  #[serde(default = "default_module_name")]
  pub module_name: String,
  pub source: PathBuf,
  #[serde(default = "default_language")]
  pub language: String,
}

fn default_module_name() -> String {
  DEFAULT_MODULE_NAME.to_string()
}

fn default_language() -> String {
  DEFAULT_LANGUAGE.to_string()
}

impl ExtensionSettings {
  pub fn new(source: impl Into<PathBuf>) -> Self {
    Self {
      module_name: default_module_name(),
      source: source.into(),
      language: default_language(),
    }
  }
}

/// Immutable per-run input to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
  pub base_directory: PathBuf,
  pub environment: BTreeMap<String, String>,
  pub template: TemplateRoots,
  pub dependencies: DependencyPaths,
  pub extension: ExtensionSettings,
  /// Relative marker for "two directories above the loaded module".
  pub runtime_marker: String,
  /// Enables the fat-packaging data bundle. Off unless explicitly requested.
  pub bundle_data: bool,
}

impl BuildContext {
  /// Context for a setup script at `script_path` with an empty environment.
  pub fn new(
    script_path: &Path,
    template: TemplateRoots,
    dependencies: DependencyPaths,
    extension: ExtensionSettings,
  ) -> Self {
    Self {
      base_directory: repository_root(script_path),
      environment: BTreeMap::new(),
      template,
      dependencies,
      extension,
      runtime_marker: host_runtime_marker().to_string(),
      bundle_data: false,
    }
  }

  pub fn with_environment<I, K, V>(mut self, vars: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    self.environment = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    self
  }

  /// Snapshot the process environment. Variables that are not valid UTF-8
  /// are skipped, with a warning if the root override is among them.
  pub fn with_process_environment(self) -> Self {
    let vars: Vec<(String, String)> = std::env::vars_os()
      .filter_map(|(k, v)| match (k.into_string(), v.into_string()) {
        (Ok(k), Ok(v)) => Some((k, v)),
        (Ok(k), Err(v)) if k == ROOT_OVERRIDE_VAR => {
          warn!(value = %v.to_string_lossy(), "{ROOT_OVERRIDE_VAR} is not valid UTF-8; ignoring it");
          None
        }
        _ => None,
      })
      .collect();
    self.with_environment(vars)
  }

  pub fn with_runtime_marker(mut self, marker: impl Into<String>) -> Self {
    self.runtime_marker = marker.into();
    self
  }

  pub fn with_bundle_data(mut self, enabled: bool) -> Self {
    self.bundle_data = enabled;
    self
  }
}

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root; leading `..` in a relative path is kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match out.components().next_back() {
        Some(Component::Normal(_)) => {
          out.pop();
        }
        Some(Component::RootDir | Component::Prefix(_)) => {}
        _ => out.push(".."),
      },
      other => out.push(other),
    }
  }
  out
}

/// Repository root: two directories above the script, computed lexically.
///
/// A relocated script yields a wrong root; that is reported by the compiler
/// as a missing header, not here.
pub fn repository_root(script_path: &Path) -> PathBuf {
  fn parent(p: &Path) -> &Path {
    p.parent().unwrap_or(p)
  }

  let script_path = normalize_lexically(script_path);
  let root = parent(parent(&script_path));
  if root.as_os_str().is_empty() {
    PathBuf::from(".")
  } else {
    root.to_path_buf()
  }
}
