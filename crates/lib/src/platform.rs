//! Host platform detection for runtime search-path conventions.
//!
//! Loaders on different systems spell "the directory of the module being
//! loaded" differently. The resolver only needs to know which spelling to put
//! into the runtime library search path.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{LOADER_PATH_MARKER, ORIGIN_MARKER};

/// Operating systems with a known runtime search-path convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
  Linux,
  #[serde(rename = "darwin")]
  MacOs,
  Windows,
}

impl Os {
  /// Detect the current operating system at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "darwin",
      Self::Windows => "windows",
    }
  }

  /// Relative marker naming the directory two levels above the loaded module.
  ///
  /// Windows has no rpath; the ELF spelling is returned so the descriptor
  /// stays identical to a Linux build and the toolchain decides what to do.
  pub fn runtime_search_marker(&self) -> &'static str {
    match self {
      Self::MacOs => LOADER_PATH_MARKER,
      Self::Linux | Self::Windows => ORIGIN_MARKER,
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Runtime search marker for the host, falling back to `$ORIGIN` on unknown systems.
pub fn host_runtime_marker() -> &'static str {
  Os::current()
    .map(|os| os.runtime_search_marker())
    .unwrap_or(ORIGIN_MARKER)
}
