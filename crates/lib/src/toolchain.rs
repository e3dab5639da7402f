//! The compilation and packaging entry points.
//!
//! The toolchain that translates, compiles and packages the wrapper is an
//! external program. [`Toolchain`] is the seam; [`CommandToolchain`] drives a
//! configured command by writing each request to its stdin as JSON.
//!
//! # Protocol
//!
//! The command is spawned once per step. Its stdin receives a single JSON
//! object tagged with `"step": "compile"` or `"step": "package"`. For a
//! compile step, the trimmed stdout is the path of the built module. A
//! non-zero exit aborts the build.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::descriptor::{CompilerDirectives, DataBundle, ExtensionDescriptor};

/// Render a path list for error messages, one entry per line.
fn format_paths(paths: &[PathBuf]) -> String {
  if paths.is_empty() {
    return "    (none)".to_string();
  }
  paths
    .iter()
    .map(|p| format!("    {}", p.display()))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Errors that can occur in the compilation or packaging step.
#[derive(Debug, Error)]
pub enum ToolchainError {
  #[error("failed to run toolchain {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to encode {step} request: {source}")]
  Encode {
    step: &'static str,
    #[source]
    source: serde_json::Error,
  },

  #[error(
    "compiling {module} failed with exit code {code:?}\n{stderr}\n  include dirs:\n{}\n  library dirs:\n{}\n  runtime library dirs:\n{}",
    format_paths(.include_dirs),
    format_paths(.library_dirs),
    format_paths(.runtime_library_dirs)
  )]
  CompileFailed {
    module: String,
    code: Option<i32>,
    stderr: String,
    include_dirs: Vec<PathBuf>,
    library_dirs: Vec<PathBuf>,
    runtime_library_dirs: Vec<PathBuf>,
  },

  #[error("compiling {module} produced no module path")]
  NoModule { module: String },

  #[error("packaging {package} {version} failed with exit code {code:?}\n{stderr}")]
  PackageFailed {
    package: String,
    version: String,
    code: Option<i32>,
    stderr: String,
  },
}

/// Input to the compilation entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileRequest {
  pub descriptor: ExtensionDescriptor,
  pub directives: CompilerDirectives,
  /// Search path for the wrapper's declaration files.
  pub include_path: Vec<PathBuf>,
}

/// A compiled extension module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltModule {
  pub name: String,
  pub path: PathBuf,
}

/// Input to the packaging entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageRequest {
  pub name: String,
  pub version: String,
  pub modules: Vec<BuiltModule>,
  pub data_files: DataBundle,
}

/// Compilation and packaging backend.
pub trait Toolchain {
  fn compile(&self, request: &CompileRequest) -> Result<BuiltModule, ToolchainError>;

  fn package(&self, request: &PackageRequest) -> Result<(), ToolchainError>;
}

#[derive(Serialize)]
#[serde(tag = "step", rename_all = "lowercase")]
enum Step<'a> {
  Compile(&'a CompileRequest),
  Package(&'a PackageRequest),
}

struct StepOutput {
  code: Option<i32>,
  success: bool,
  stdout: String,
  stderr: String,
}

/// Runs an external command for each toolchain step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandToolchain {
  pub program: String,
  #[serde(default)]
  pub args: Vec<String>,
  /// Working directory; defaults to the current directory.
  #[serde(default)]
  pub cwd: Option<PathBuf>,
}

impl CommandToolchain {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
    }
  }

  pub fn with_args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args = args.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_cwd(mut self, cwd: &Path) -> Self {
    self.cwd = Some(cwd.to_path_buf());
    self
  }

  fn run(&self, step: &Step<'_>, step_name: &'static str) -> Result<StepOutput, ToolchainError> {
    let payload = serde_json::to_vec(step).map_err(|source| ToolchainError::Encode {
      step: step_name,
      source,
    })?;

    let spawn_err = |source| ToolchainError::Spawn {
      program: self.program.clone(),
      source,
    };

    let mut command = Command::new(&self.program);
    command
      .args(&self.args)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped());
    if let Some(cwd) = &self.cwd {
      command.current_dir(cwd);
    }

    info!(program = %self.program, step = step_name, "running toolchain");
    let mut child = command.spawn().map_err(spawn_err)?;
    let stdin = child.stdin.take();

    // stdin is fed while stdout and stderr drain, so neither side can stall
    // on a full pipe.
    let output = std::thread::scope(|s| {
      if let Some(mut stdin) = stdin {
        s.spawn(move || {
          // A toolchain that exits without reading stdin closes the pipe; its
          // exit status is what gets reported.
          if let Err(e) = stdin.write_all(&payload) {
            debug!(error = %e, "toolchain closed stdin early");
          }
        });
      }
      child.wait_with_output()
    })
    .map_err(spawn_err)?;
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !stderr.is_empty() {
      debug!(stderr = %stderr, "toolchain stderr");
    }

    Ok(StepOutput {
      code: output.status.code(),
      success: output.status.success(),
      stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
      stderr,
    })
  }
}

impl Toolchain for CommandToolchain {
  fn compile(&self, request: &CompileRequest) -> Result<BuiltModule, ToolchainError> {
    let descriptor = &request.descriptor;
    let out = self.run(&Step::Compile(request), "compile")?;

    if !out.success {
      return Err(ToolchainError::CompileFailed {
        module: descriptor.module_name.clone(),
        code: out.code,
        stderr: out.stderr,
        include_dirs: descriptor.include_dirs.clone(),
        library_dirs: descriptor.library_dirs.clone(),
        runtime_library_dirs: descriptor.runtime_library_dirs.clone(),
      });
    }

    let path = out.stdout.lines().last().unwrap_or_default().trim();
    if path.is_empty() {
      return Err(ToolchainError::NoModule {
        module: descriptor.module_name.clone(),
      });
    }

    Ok(BuiltModule {
      name: descriptor.module_name.clone(),
      path: PathBuf::from(path),
    })
  }

  fn package(&self, request: &PackageRequest) -> Result<(), ToolchainError> {
    let out = self.run(&Step::Package(request), "package")?;

    if !out.success {
      return Err(ToolchainError::PackageFailed {
        package: request.name.clone(),
        version: request.version.clone(),
        code: out.code,
        stderr: out.stderr,
      });
    }

    Ok(())
  }
}
