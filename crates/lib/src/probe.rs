//! Locating the numeric-array and columnar-format libraries.
//!
//! Both are installed into the Python environment the extension is built
//! for, and only that environment knows where they put their headers and
//! shared libraries. Probing happens once, before the [`BuildContext`] is
//! built, so resolution itself never spawns anything.
//!
//! [`BuildContext`]: crate::context::BuildContext

use std::path::PathBuf;
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

use crate::context::DependencyPaths;

/// Errors that can occur while querying the dependency libraries.
#[derive(Debug, Error)]
pub enum ProbeError {
  #[error("failed to run {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  #[error("{program} exited with code {code:?} while querying {query}: {stderr}")]
  Failed {
    program: String,
    query: &'static str,
    code: Option<i32>,
    stderr: String,
  },

  #[error("unexpected output from {query}: {message}")]
  Output { query: &'static str, message: String },
}

/// Source of dependency locations.
pub trait DependencyProbe {
  fn numeric_include(&self) -> Result<PathBuf, ProbeError>;
  fn columnar_include(&self) -> Result<PathBuf, ProbeError>;
  fn columnar_library_dirs(&self) -> Result<Vec<PathBuf>, ProbeError>;
  fn columnar_libraries(&self) -> Result<Vec<String>, ProbeError>;
}

/// Query every location once and collect them.
pub fn probe_dependencies(probe: &impl DependencyProbe) -> Result<DependencyPaths, ProbeError> {
  let paths = DependencyPaths {
    numeric_include: probe.numeric_include()?,
    columnar_include: probe.columnar_include()?,
    columnar_library_dirs: probe.columnar_library_dirs()?,
    columnar_libraries: probe.columnar_libraries()?,
  };
  info!(
    numeric_include = %paths.numeric_include.display(),
    columnar_include = %paths.columnar_include.display(),
    columnar_libraries = ?paths.columnar_libraries,
    "located dependency libraries"
  );
  Ok(paths)
}

/// Fixed locations, typically from the `[dependencies]` config section.
#[derive(Debug, Clone)]
pub struct StaticProbe(pub DependencyPaths);

impl DependencyProbe for StaticProbe {
  fn numeric_include(&self) -> Result<PathBuf, ProbeError> {
    Ok(self.0.numeric_include.clone())
  }

  fn columnar_include(&self) -> Result<PathBuf, ProbeError> {
    Ok(self.0.columnar_include.clone())
  }

  fn columnar_library_dirs(&self) -> Result<Vec<PathBuf>, ProbeError> {
    Ok(self.0.columnar_library_dirs.clone())
  }

  fn columnar_libraries(&self) -> Result<Vec<String>, ProbeError> {
    Ok(self.0.columnar_libraries.clone())
  }
}

/// Asks a Python interpreter for numpy's and pyarrow's locations.
#[derive(Debug, Clone)]
pub struct PythonProbe {
  program: String,
}

impl PythonProbe {
  pub fn new(program: impl Into<String>) -> Self {
    Self { program: program.into() }
  }

  /// Interpreter from `$PYTHON`, or `python3`.
  pub fn from_env() -> Self {
    Self::new(std::env::var("PYTHON").unwrap_or_else(|_| "python3".to_string()))
  }

  pub fn program(&self) -> &str {
    &self.program
  }

  fn run(&self, query: &'static str, script: &str) -> Result<String, ProbeError> {
    debug!(program = %self.program, query, "probing");

    let output = Command::new(&self.program)
      .arg("-c")
      .arg(script)
      .output()
      .map_err(|source| ProbeError::Spawn {
        program: self.program.clone(),
        source,
      })?;

    if !output.status.success() {
      return Err(ProbeError::Failed {
        program: self.program.clone(),
        query,
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  fn run_path(&self, query: &'static str, script: &str) -> Result<PathBuf, ProbeError> {
    let out = self.run(query, script)?;
    if out.is_empty() {
      return Err(ProbeError::Output {
        query,
        message: "empty path".to_string(),
      });
    }
    Ok(PathBuf::from(out))
  }

  fn run_list(&self, query: &'static str, script: &str) -> Result<Vec<String>, ProbeError> {
    let out = self.run(query, script)?;
    parse_string_list(query, &out)
  }
}

fn parse_string_list(query: &'static str, out: &str) -> Result<Vec<String>, ProbeError> {
  serde_json::from_str(out).map_err(|e| ProbeError::Output {
    query,
    message: e.to_string(),
  })
}

impl DependencyProbe for PythonProbe {
  fn numeric_include(&self) -> Result<PathBuf, ProbeError> {
    self.run_path("numpy.get_include", "import numpy; print(numpy.get_include())")
  }

  fn columnar_include(&self) -> Result<PathBuf, ProbeError> {
    self.run_path("pyarrow.get_include", "import pyarrow; print(pyarrow.get_include())")
  }

  fn columnar_library_dirs(&self) -> Result<Vec<PathBuf>, ProbeError> {
    let dirs = self.run_list(
      "pyarrow.get_library_dirs",
      "import json, pyarrow; print(json.dumps(pyarrow.get_library_dirs()))",
    )?;
    Ok(dirs.into_iter().map(PathBuf::from).collect())
  }

  fn columnar_libraries(&self) -> Result<Vec<String>, ProbeError> {
    self.run_list(
      "pyarrow.get_libraries",
      "import json, pyarrow; print(json.dumps(pyarrow.get_libraries()))",
    )
  }
}
