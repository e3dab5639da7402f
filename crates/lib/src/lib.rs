//! dbe-build-lib: build-parameter resolution for the embedded engine wrapper
//!
//! This crate computes how to compile and link the `heavydbe` extension module
//! against the separately built `DBEngine` shared library:
//! - `BuildContext`: immutable inputs (template roots, dependency locations, environment)
//! - `ExtensionDescriptor`: resolved include/library/runtime search paths and flags
//! - `DataBundle`: auxiliary files for fat packaging, empty unless enabled
//! - `Toolchain`: the external compile and package steps

pub mod cargo;
pub mod config;
pub mod consts;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod hash;
pub mod placeholder;
pub mod platform;
pub mod probe;
pub mod resolve;
pub mod setup;
pub mod toolchain;

pub use error::{Error, Result};
