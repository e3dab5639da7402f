//! `resolve` and `cargo` command integration tests.

use predicates::prelude::*;
use serde_json::json;

use super::common::{TestEnv, stdout_json};

#[test]
fn resolve_without_override() {
  let env = TestEnv::new();

  let output = env
    .dbe_cmd()
    .args(["resolve", "--format", "json", "--config"])
    .arg(&env.config_path)
    .output()
    .unwrap();
  let json = stdout_json(&output);
  let d = &json["descriptor"];

  assert_eq!(d["module_name"], "heavydbe");
  assert_eq!(d["library_dirs"], json!(["/venv/pyarrow", "/build/Embedded", "."]));
  assert_eq!(d["runtime_library_dirs"].as_array().unwrap().len(), 2);
  assert_eq!(
    d["libraries"],
    json!(["arrow", "arrow_python", "DBEngine", "boost_system"])
  );
  assert_eq!(json["data_files"], json!([]));
  assert_eq!(json["fingerprint"].as_str().unwrap().len(), 20);
}

#[test]
fn resolve_with_override_appends_lib_dir() {
  let env = TestEnv::new();

  let output = env
    .dbe_cmd()
    .args(["resolve", "--format", "json", "--config"])
    .arg(&env.config_path)
    .env("HEAVYDB_ROOT_PATH", "/opt/heavydbe")
    .output()
    .unwrap();
  let d = stdout_json(&output)["descriptor"].clone();

  assert_eq!(
    d["library_dirs"],
    json!(["/venv/pyarrow", "/build/Embedded", ".", "/opt/heavydbe/lib"])
  );
  let runtime = d["runtime_library_dirs"].as_array().unwrap();
  assert_eq!(runtime.len(), 3);
  assert_eq!(runtime[2], "/opt/heavydbe/lib");
}

#[test]
fn resolve_repository_root_is_two_levels_up() {
  let env = TestEnv::new();

  let output = env
    .dbe_cmd()
    .args(["resolve", "--format", "json", "--config"])
    .arg(&env.config_path)
    .output()
    .unwrap();
  let json = stdout_json(&output);

  let root = env.repo_root();
  assert_eq!(json["descriptor"]["include_dirs"][2], root.to_str().unwrap());
}

#[test]
fn resolve_explicit_script_path() {
  let env = TestEnv::new();

  let output = env
    .dbe_cmd()
    .args(["resolve", "--format", "json", "--script", "/opt/src/Embedded/setup.py", "--config"])
    .arg(&env.config_path)
    .output()
    .unwrap();
  let json = stdout_json(&output);

  assert_eq!(json["descriptor"]["include_dirs"][2], "/opt/src");
}

#[test]
fn resolve_relative_script_with_parent_components() {
  let env = TestEnv::new();

  let output = env
    .dbe_cmd()
    .args(["resolve", "--format", "json", "--script", "build/Other/../Embedded/setup.py", "--config"])
    .arg(&env.config_path)
    .output()
    .unwrap();
  let json = stdout_json(&output);

  let root = std::path::absolute(env.temp.path().join("build")).unwrap();
  assert_eq!(json["descriptor"]["include_dirs"][2], root.to_str().unwrap());
}

#[test]
fn resolve_text_lists_paths() {
  let env = TestEnv::new();

  env
    .dbe_cmd()
    .arg("resolve")
    .arg("--config")
    .arg(&env.config_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("Library dirs"))
    .stdout(predicate::str::contains("/src/heavydb/ThirdParty/rapidjson"))
    .stdout(predicate::str::contains("bundle_data = false"));
}

#[test]
fn resolve_lists_bundle_when_enabled() {
  let env = TestEnv::with_config("");
  let content = std::fs::read_to_string(&env.config_path).unwrap();
  std::fs::write(&env.config_path, format!("bundle_data = true\n{content}")).unwrap();

  let output = env
    .dbe_cmd()
    .args(["resolve", "--format", "json", "--config"])
    .arg(&env.config_path)
    .output()
    .unwrap();
  let bundle = stdout_json(&output)["data_files"].clone();

  let destinations: Vec<_> = bundle
    .as_array()
    .unwrap()
    .iter()
    .map(|e| e["destination"].as_str().unwrap().to_string())
    .collect();
  assert_eq!(destinations, ["lib", "bin", "QueryEngine", "include"]);
}

#[test]
fn resolve_rejects_unsubstituted_config() {
  let env = TestEnv::new();
  let content = std::fs::read_to_string(&env.config_path).unwrap();
  std::fs::write(
    &env.config_path,
    content.replace("\"/build\"", "\"@CMAKE_BINARY_DIR@\""),
  )
  .unwrap();

  env
    .dbe_cmd()
    .arg("resolve")
    .arg("--config")
    .arg(&env.config_path)
    .assert()
    .failure()
    .stderr(predicate::str::contains("template.binary_dir"));
}

#[test]
fn cargo_directives_follow_descriptor() {
  let env = TestEnv::new();

  env
    .dbe_cmd()
    .arg("cargo")
    .arg("--config")
    .arg(&env.config_path)
    .env("HEAVYDB_ROOT_PATH", "/opt/heavydbe")
    .assert()
    .success()
    .stdout(predicate::str::contains("cargo:rustc-link-search=native=/opt/heavydbe/lib"))
    .stdout(predicate::str::contains("cargo:rustc-link-lib=DBEngine"))
    .stdout(predicate::str::contains("cargo:rerun-if-env-changed=HEAVYDB_ROOT_PATH"));
}
