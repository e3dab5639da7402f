//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Rendered-config body with fixed dependency locations, so no interpreter
/// is needed.
pub const SETUP_CONFIG: &str = r#"
[extension]
source = "/src/heavydb/Embedded/Python/dbe.pyx"

[template]
source_dir = "/src/heavydb"
current_source_dir = "/src/heavydb/Embedded"
current_binary_dir = "/build/Embedded"
binary_dir = "/build"

[dependencies]
numeric_include = "/venv/numpy/core/include"
columnar_include = "/venv/pyarrow/include"
columnar_library_dirs = ["/venv/pyarrow"]
columnar_libraries = ["arrow", "arrow_python"]
"#;

/// Isolated test environment.
///
/// The config lives at `<temp>/build/Embedded/setup.toml`, so the resolved
/// repository root is `<temp>/build`.
pub struct TestEnv {
  pub temp: TempDir,
  pub config_path: PathBuf,
}

impl TestEnv {
  pub fn with_config(extra: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("build").join("Embedded").join("setup.toml");
    std::fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    std::fs::write(&config_path, format!("{SETUP_CONFIG}{extra}")).unwrap();
    Self { temp, config_path }
  }

  pub fn new() -> Self {
    Self::with_config("")
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) -> PathBuf {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  /// Canonical repository root as the binary will compute it.
  pub fn repo_root(&self) -> PathBuf {
    let p = self.temp.path().join("build");
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Command for the binary with the engine override cleared.
  pub fn dbe_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("dbe-build");
    cmd.env_remove("HEAVYDB_ROOT_PATH");
    cmd.current_dir(self.temp.path());
    cmd
  }
}

/// Parse a command's stdout as JSON.
pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
  assert!(
    output.status.success(),
    "command failed: {}",
    String::from_utf8_lossy(&output.stderr)
  );
  serde_json::from_slice(&output.stdout).unwrap()
}
