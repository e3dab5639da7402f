//! End-to-end setup: context -> descriptor -> compile -> package.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::config::{PackageSettings, SetupConfig};
use crate::consts::ROOT_OVERRIDE_VAR;
use crate::context::{BuildContext, DependencyPaths};
use crate::descriptor::{CompilerDirectives, DataBundle, ExtensionDescriptor};
use crate::error::Result;
use crate::hash::{HashError, Hashable, ObjectHash};
use crate::probe::{PythonProbe, StaticProbe, probe_dependencies};
use crate::resolve::{resolve_data_bundle, resolve_descriptor};
use crate::toolchain::{BuiltModule, CompileRequest, PackageRequest, Toolchain, ToolchainError};

/// Everything resolved for one build, ready to hand to a toolchain.
#[derive(Debug, Clone, Serialize)]
pub struct SetupPlan {
  pub package: PackageSettings,
  pub descriptor: ExtensionDescriptor,
  pub data_bundle: DataBundle,
  pub directives: CompilerDirectives,
  pub include_path: Vec<PathBuf>,
}

impl SetupPlan {
  pub fn resolve(context: &BuildContext, config: &SetupConfig) -> Self {
    Self {
      package: config.package.clone(),
      descriptor: resolve_descriptor(context),
      data_bundle: resolve_data_bundle(context),
      directives: config.cython.directives.clone(),
      include_path: config.cython_include_path(),
    }
  }

  pub fn fingerprint(&self) -> std::result::Result<ObjectHash, HashError> {
    self.descriptor.compute_hash()
  }

  fn compile_request(&self) -> CompileRequest {
    CompileRequest {
      descriptor: self.descriptor.clone(),
      directives: self.directives.clone(),
      include_path: self.include_path.clone(),
    }
  }
}

/// Build a context from a loaded config and already-probed dependencies.
pub fn build_context(config: &SetupConfig, script_path: &Path, dependencies: DependencyPaths) -> BuildContext {
  BuildContext::new(
    script_path,
    config.template.clone(),
    dependencies,
    config.extension.clone(),
  )
  .with_bundle_data(config.bundle_data)
}

/// Probe dependencies, snapshot the environment and resolve a plan.
///
/// Uses the config's `[dependencies]` when present, otherwise asks the
/// interpreter named by `$PYTHON` (default `python3`).
pub fn prepare(config: &SetupConfig, script_path: &Path) -> Result<SetupPlan> {
  let dependencies = match &config.dependencies {
    Some(fixed) => probe_dependencies(&StaticProbe(fixed.clone()))?,
    None => probe_with(&PythonProbe::from_env())?,
  };

  let context = build_context(config, script_path, dependencies).with_process_environment();
  if !context.environment.contains_key(ROOT_OVERRIDE_VAR) {
    info!("{ROOT_OVERRIDE_VAR} not set; using build-tree library paths only");
  }

  Ok(SetupPlan::resolve(&context, config))
}

fn probe_with(probe: &PythonProbe) -> Result<DependencyPaths> {
  info!(program = %probe.program(), "probing dependency libraries");
  Ok(probe_dependencies(probe)?)
}

/// Result of a completed setup.
#[derive(Debug, Clone, Serialize)]
pub struct SetupOutcome {
  pub package: PackageSettings,
  pub modules: Vec<BuiltModule>,
  pub bundled_destinations: usize,
}

/// Compile the extension, then package it. The first failure aborts.
pub fn run_setup(plan: &SetupPlan, toolchain: &impl Toolchain) -> std::result::Result<SetupOutcome, ToolchainError> {
  let module = toolchain.compile(&plan.compile_request())?;
  info!(module = %module.name, path = %module.path.display(), "compiled extension");

  if !plan.data_bundle.is_empty() {
    warn!(
      destinations = plan.data_bundle.len(),
      "bundling engine artifacts into the package"
    );
  }

  let request = PackageRequest {
    name: plan.package.name.clone(),
    version: plan.package.version.clone(),
    modules: vec![module],
    data_files: plan.data_bundle.clone(),
  };
  toolchain.package(&request)?;
  info!(package = %request.name, version = %request.version, "packaged");

  Ok(SetupOutcome {
    package: plan.package.clone(),
    modules: request.modules,
    bundled_destinations: plan.data_bundle.len(),
  })
}
