//! gobuilder: build-action driver for Go packages compiled with gccgo.
//!
//! The build-rule layer decides *what* to build and hands this crate flattened
//! file lists. This crate decides *how*:
//!
//! - [`source`]: reads Go file headers and applies build constraints
//! - [`importcfg`]: the `packagefile path=archive` mapping format, with package substitution
//! - [`naming`]: where a package's archive lives and how the linker finds it
//! - [`deps`]: classifies dependency descriptors and computes closures
//! - [`toolchain`]: builds argument lists and runs the external tools
//!
//! # Example
//!
//! ```
//! use gobuilder_lib::naming::{archive_path, link_name};
//!
//! let archive = archive_path("mytarget", "example.com/foo").unwrap();
//! assert_eq!(archive.to_str(), Some("mytarget%/example.com/libfoo.a"));
//! assert_eq!(link_name(&archive), Some("foo"));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::path::PathBuf;
use std::process::ExitStatus;

pub mod deps;
pub mod importcfg;
pub mod naming;
pub mod source;
pub mod toolchain;

#[cfg(test)]
mod test_utils;

pub use deps::{Archive, Dependency, DependencySet, LibraryInfo};
pub use importcfg::{Importcfg, ImportcfgManager, SubstitutionTable};
pub use source::{BuildContext, SourceInfo};
pub use toolchain::{Toolchain, ToolchainConfig};

/// Errors produced by any build action.
///
/// None of these are retried. Each carries enough context (file, import path,
/// or command line) to diagnose the failure without re-running.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed invocation: bad descriptor, missing input, naming violation.
    #[error("{0}")]
    Argument(String),

    /// A Go source header could not be read as valid syntax.
    #[error("{}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// The source uses a feature this driver does not support (cgo).
    #[error("{}: {feature} not supported", path.display())]
    UnsupportedFeature { path: PathBuf, feature: &'static str },

    /// An import is provided by neither a direct dependency nor the standard library.
    #[error("{}: import {import:?} is not provided by any direct dependency", path.display())]
    UnresolvedImport { path: PathBuf, import: String },

    /// An external tool could not be started.
    #[error("failed to run {}: {source}", program.display())]
    ToolchainSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external tool exited unsuccessfully.
    #[error("{command} failed: {status}")]
    ToolchainFailed { command: String, status: ExitStatus },

    /// An external tool produced output that could not be decoded.
    #[error("decoding {} output: {source}", program.display())]
    ToolOutput {
        program: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for build actions.
pub type Result<T> = std::result::Result<T, Error>;
