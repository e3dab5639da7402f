//! Setup configuration.
//!
//! The outer build system renders `setup.toml` from a template, filling in
//! every `@NAME@` token. This module loads the result and checks that no
//! token was left behind. Paths are not checked for existence.
//!
//! ```toml
//! bundle_data = false
//!
//! [package]
//! name = "heavydbe"
//! version = "0.1"
//!
//! [extension]
//! source = "/src/heavydb/Embedded/Python/dbe.pyx"
//!
//! [template]
//! source_dir = "/src/heavydb"
//! current_source_dir = "/src/heavydb/Embedded"
//! current_binary_dir = "/build/Embedded"
//! binary_dir = "/build"
//!
//! [toolchain]
//! program = "python3"
//! args = ["build_ext.py"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{DEFAULT_PACKAGE_NAME, DEFAULT_PACKAGE_VERSION};
use crate::context::{DependencyPaths, ExtensionSettings, TemplateRoots};
use crate::descriptor::CompilerDirectives;
use crate::placeholder::contains_placeholders;
use crate::toolchain::CommandToolchain;

/// Errors that can occur while loading the setup config.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid config: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("config field `{field}` was not substituted: {value}")]
  Unsubstituted { field: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSettings {
  #[serde(default = "default_package_name")]
  pub name: String,
  #[serde(default = "default_package_version")]
  pub version: String,
}

fn default_package_name() -> String {
  DEFAULT_PACKAGE_NAME.to_string()
}

fn default_package_version() -> String {
  DEFAULT_PACKAGE_VERSION.to_string()
}

impl Default for PackageSettings {
  fn default() -> Self {
    Self {
      name: default_package_name(),
      version: default_package_version(),
    }
  }
}

/// Settings for translating the wrapper source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CythonSettings {
  #[serde(default)]
  pub directives: CompilerDirectives,
  /// Search path for declaration files. Empty means the wrapper's source
  /// directory and its `Python` subdirectory.
  #[serde(default)]
  pub include_path: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupConfig {
  #[serde(default)]
  pub bundle_data: bool,
  #[serde(default)]
  pub package: PackageSettings,
  pub extension: ExtensionSettings,
  pub template: TemplateRoots,
  /// Fixed dependency locations; probed from the interpreter when absent.
  #[serde(default)]
  pub dependencies: Option<DependencyPaths>,
  #[serde(default)]
  pub cython: CythonSettings,
  #[serde(default)]
  pub toolchain: Option<CommandToolchain>,
}

impl SetupConfig {
  /// Load and validate a config file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    debug!(path = %path.display(), "loading setup config");
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_toml_str(&content)
  }

  pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
    let config: Self = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  /// Reject values still carrying `@NAME@` or `$<...>` tokens.
  pub fn validate(&self) -> Result<(), ConfigError> {
    for (field, value) in self.string_fields() {
      if contains_placeholders(&value) {
        return Err(ConfigError::Unsubstituted {
          field,
          value,
        });
      }
    }
    Ok(())
  }

  fn string_fields(&self) -> Vec<(String, String)> {
    fn path(p: &Path) -> String {
      p.to_string_lossy().into_owned()
    }

    let t = &self.template;

    let mut fields = vec![
      ("package.name".to_string(), self.package.name.clone()),
      ("package.version".to_string(), self.package.version.clone()),
      ("extension.module_name".to_string(), self.extension.module_name.clone()),
      ("extension.source".to_string(), path(&self.extension.source)),
      ("extension.language".to_string(), self.extension.language.clone()),
      ("template.source_dir".to_string(), path(&t.source_dir)),
      ("template.current_source_dir".to_string(), path(&t.current_source_dir)),
      ("template.current_binary_dir".to_string(), path(&t.current_binary_dir)),
      ("template.binary_dir".to_string(), path(&t.binary_dir)),
    ];
    if let Some(engine) = &t.engine_target_file {
      fields.push(("template.engine_target_file".to_string(), path(engine)));
    }
    if let Some(deps) = &self.dependencies {
      fields.push(("dependencies.numeric_include".to_string(), path(&deps.numeric_include)));
      fields.push(("dependencies.columnar_include".to_string(), path(&deps.columnar_include)));
      for (i, dir) in deps.columnar_library_dirs.iter().enumerate() {
        fields.push((format!("dependencies.columnar_library_dirs[{i}]"), path(dir)));
      }
      for (i, lib) in deps.columnar_libraries.iter().enumerate() {
        fields.push((format!("dependencies.columnar_libraries[{i}]"), lib.clone()));
      }
    }
    let directives = &self.cython.directives;
    fields.push(("cython.directives.c_string_type".to_string(), directives.c_string_type.clone()));
    fields.push(("cython.directives.c_string_encoding".to_string(), directives.c_string_encoding.clone()));
    fields.push(("cython.directives.language_level".to_string(), directives.language_level.clone()));
    for (i, dir) in self.cython.include_path.iter().enumerate() {
      fields.push((format!("cython.include_path[{i}]"), path(dir)));
    }
    if let Some(toolchain) = &self.toolchain {
      fields.push(("toolchain.program".to_string(), toolchain.program.clone()));
      for (i, arg) in toolchain.args.iter().enumerate() {
        fields.push((format!("toolchain.args[{i}]"), arg.clone()));
      }
      if let Some(cwd) = &toolchain.cwd {
        fields.push(("toolchain.cwd".to_string(), path(cwd)));
      }
    }
    fields
  }

  /// Declaration-file search path for the translator.
  pub fn cython_include_path(&self) -> Vec<PathBuf> {
    if !self.cython.include_path.is_empty() {
      return self.cython.include_path.clone();
    }
    let dir = &self.template.current_source_dir;
    vec![dir.clone(), dir.join("Python")]
  }
}
