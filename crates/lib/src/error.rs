use thiserror::Error;

use crate::config::ConfigError;
use crate::hash::HashError;
use crate::placeholder::PlaceholderError;
use crate::probe::ProbeError;
use crate::toolchain::ToolchainError;

/// Any failure across loading, probing, rendering and building.
#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("dependency probe failed: {0}")]
  Probe(#[from] ProbeError),

  #[error("template error: {0}")]
  Placeholder(#[from] PlaceholderError),

  #[error(transparent)]
  Toolchain(#[from] ToolchainError),

  #[error("failed to fingerprint descriptor: {0}")]
  Hash(#[from] HashError),
}

pub type Result<T> = std::result::Result<T, Error>;
