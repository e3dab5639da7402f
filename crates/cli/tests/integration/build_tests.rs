//! `build` command integration tests.
//!
//! The toolchain is a shell script that records each request it receives.

use predicates::prelude::*;

use super::common::{TestEnv, stdout_json};

/// Config tail pointing the toolchain at `script`.
fn toolchain_section(script: &std::path::Path) -> String {
  format!(
    "\n[toolchain]\nprogram = \"/bin/sh\"\nargs = [\"{}\"]\n",
    script.display()
  )
}

fn recording_env() -> TestEnv {
  let env = TestEnv::new();
  let dir = env.temp.path().display().to_string();
  let script = env.write_file(
    "toolchain.sh",
    &format!(
      r#"payload=$(cat)
case "$payload" in
  *'"step":"compile"'*) printf '%s' "$payload" > "{dir}/compile.json"; echo "{dir}/heavydbe.so" ;;
  *) printf '%s' "$payload" > "{dir}/package.json" ;;
esac
"#
    ),
  );
  let content = std::fs::read_to_string(&env.config_path).unwrap();
  std::fs::write(&env.config_path, format!("{content}{}", toolchain_section(&script))).unwrap();
  env
}

#[test]
fn build_compiles_then_packages() {
  if cfg!(windows) {
    return;
  }

  let env = recording_env();

  let output = env
    .dbe_cmd()
    .args(["build", "--format", "json", "--config"])
    .arg(&env.config_path)
    .output()
    .unwrap();
  let outcome = stdout_json(&output);
  assert_eq!(outcome["package"]["name"], "heavydbe");
  assert_eq!(outcome["modules"][0]["name"], "heavydbe");

  let compile: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(env.temp.path().join("compile.json")).unwrap()).unwrap();
  assert_eq!(compile["directives"]["c_string_type"], "str");
  assert_eq!(compile["directives"]["language_level"], "3");
  assert_eq!(
    compile["include_path"],
    serde_json::json!(["/src/heavydb/Embedded", "/src/heavydb/Embedded/Python"])
  );

  let package: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(env.temp.path().join("package.json")).unwrap()).unwrap();
  assert_eq!(package["version"], "0.1");
  assert_eq!(package["data_files"], serde_json::json!([]));
}

#[test]
fn build_failure_reports_search_paths() {
  if cfg!(windows) {
    return;
  }

  let env = TestEnv::new();
  let script = env.write_file(
    "failing.sh",
    "cat > /dev/null\necho 'ld: cannot find -lDBEngine' >&2\nexit 1\n",
  );
  let content = std::fs::read_to_string(&env.config_path).unwrap();
  std::fs::write(&env.config_path, format!("{content}{}", toolchain_section(&script))).unwrap();

  env
    .dbe_cmd()
    .arg("build")
    .arg("--config")
    .arg(&env.config_path)
    .env("HEAVYDB_ROOT_PATH", "/opt/heavydbe")
    .assert()
    .failure()
    .stderr(predicate::str::contains("cannot find -lDBEngine"))
    .stderr(predicate::str::contains("library dirs"))
    .stderr(predicate::str::contains("/opt/heavydbe/lib"));

  assert!(!env.temp.path().join("package.json").exists());
}

#[test]
fn build_without_toolchain_fails() {
  let env = TestEnv::new();

  env
    .dbe_cmd()
    .arg("build")
    .arg("--config")
    .arg(&env.config_path)
    .assert()
    .failure()
    .stderr(predicate::str::contains("No [toolchain] configured"));
}
