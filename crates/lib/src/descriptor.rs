//! Output types of descriptor resolution.
//!
//! An [`ExtensionDescriptor`] is everything the compilation step needs to
//! build and link the wrapper module. A [`DataBundle`] lists auxiliary files
//! installed next to it. Both are plain values: built once, never mutated.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::hash::Hashable;

/// A preprocessor macro passed to the compiler (`-DNAME` or `-DNAME=VALUE`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MacroDefinition {
  pub name: String,
  pub value: Option<String>,
}

impl MacroDefinition {
  pub fn new(name: impl Into<String>, value: Option<&str>) -> Self {
    Self {
      name: name.into(),
      value: value.map(str::to_string),
    }
  }
}

/// Compile and link parameters for one extension module.
///
/// All path sequences are ordered by search precedence and may contain
/// duplicates; the first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionDescriptor {
  pub module_name: String,
  pub source_files: Vec<PathBuf>,
  pub language_standard: String,
  pub include_dirs: Vec<PathBuf>,
  pub library_dirs: Vec<PathBuf>,
  pub runtime_library_dirs: Vec<PathBuf>,
  pub libraries: Vec<String>,
  pub extra_flags: Vec<String>,
  pub macro_definitions: BTreeSet<MacroDefinition>,
}

impl Hashable for ExtensionDescriptor {}

/// Files to co-install under one destination directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataBundleEntry {
  pub destination: String,
  pub files: Vec<PathBuf>,
}

/// Auxiliary files for "fat" packaging, keyed by destination directory.
///
/// Destinations keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataBundle {
  entries: Vec<DataBundleEntry>,
}

impl DataBundle {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append files under `destination`, merging with an existing entry.
  pub fn with_files<I, P>(mut self, destination: &str, files: I) -> Self
  where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
  {
    let files = files.into_iter().map(Into::into);
    match self.entries.iter_mut().find(|e| e.destination == destination) {
      Some(entry) => entry.files.extend(files),
      None => self.entries.push(DataBundleEntry {
        destination: destination.to_string(),
        files: files.collect(),
      }),
    }
    self
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn get(&self, destination: &str) -> Option<&[PathBuf]> {
    self
      .entries
      .iter()
      .find(|e| e.destination == destination)
      .map(|e| e.files.as_slice())
  }

  pub fn iter(&self) -> impl Iterator<Item = &DataBundleEntry> {
    self.entries.iter()
  }
}

/// Directives handed to the wrapper-source translator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerDirectives {
  #[serde(default = "default_string_type")]
  pub c_string_type: String,
  #[serde(default = "default_string_encoding")]
  pub c_string_encoding: String,
  #[serde(default = "default_language_level")]
  pub language_level: String,
}

fn default_string_type() -> String {
  "str".to_string()
}

fn default_string_encoding() -> String {
  "utf8".to_string()
}

fn default_language_level() -> String {
  "3".to_string()
}

impl Default for CompilerDirectives {
  fn default() -> Self {
    Self {
      c_string_type: default_string_type(),
      c_string_encoding: default_string_encoding(),
      language_level: default_language_level(),
    }
  }
}
