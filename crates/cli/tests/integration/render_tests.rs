//! `render` command integration tests.

use predicates::prelude::*;

use super::common::{TestEnv, fixture_path};

const DEFINES: [&str; 10] = [
  "-D",
  "CMAKE_SOURCE_DIR=/src/heavydb",
  "-D",
  "CMAKE_CURRENT_SOURCE_DIR=/src/heavydb/Embedded",
  "-D",
  "CMAKE_CURRENT_BINARY_DIR=/build/Embedded",
  "-D",
  "CMAKE_BINARY_DIR=/build",
  "-D",
  "PACKAGE_VERSION=0.1",
];

#[test]
fn render_fills_all_tokens() {
  let env = TestEnv::new();
  let out = env.temp.path().join("rendered.toml");

  env
    .dbe_cmd()
    .arg("render")
    .arg(fixture_path("setup.toml.in"))
    .args(DEFINES)
    .args(["--target", "DBEngine=/build/Embedded/libDBEngine.so", "-o"])
    .arg(&out)
    .assert()
    .success()
    .stdout(predicate::str::contains("Rendered"));

  let rendered = std::fs::read_to_string(&out).unwrap();
  assert!(rendered.contains("source = \"/src/heavydb/Embedded/Python/dbe.pyx\""));
  assert!(rendered.contains("engine_target_file = \"/build/Embedded/libDBEngine.so\""));
  assert!(!rendered.contains('@'));
}

#[test]
fn render_to_stdout() {
  let env = TestEnv::new();

  env
    .dbe_cmd()
    .arg("render")
    .arg(fixture_path("setup.toml.in"))
    .args(DEFINES)
    .args(["--target", "DBEngine=/build/Embedded/libDBEngine.so"])
    .assert()
    .success()
    .stdout(predicate::str::contains("binary_dir = \"/build\""));
}

#[test]
fn render_missing_variable_fails() {
  let env = TestEnv::new();

  env
    .dbe_cmd()
    .arg("render")
    .arg(fixture_path("setup.toml.in"))
    .args(["-D", "CMAKE_SOURCE_DIR=/src/heavydb"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unresolved variable"));
}

#[test]
fn rendered_config_resolves() {
  let env = TestEnv::new();
  let config = env.temp.path().join("build").join("Embedded").join("rendered.toml");
  let deps = r#"
[dependencies]
numeric_include = "/venv/numpy/core/include"
columnar_include = "/venv/pyarrow/include"
"#;

  env
    .dbe_cmd()
    .arg("render")
    .arg(fixture_path("setup.toml.in"))
    .args(DEFINES)
    .args(["--target", "DBEngine=/build/Embedded/libDBEngine.so", "-o"])
    .arg(&config)
    .assert()
    .success();

  let content = std::fs::read_to_string(&config).unwrap();
  std::fs::write(&config, format!("{content}{deps}")).unwrap();

  env
    .dbe_cmd()
    .arg("resolve")
    .arg("--config")
    .arg(&config)
    .assert()
    .success()
    .stdout(predicate::str::contains("DBEngine boost_system"));
}
