//! Source inspection: package identity, imports, and build-constraint matching.
//!
//! Only the header of a file is read: the package clause, the import
//! declarations, and the comment lines above the package clause. A file that
//! does not match the [`BuildContext`] is excluded from the compile set; that
//! is not an error.

pub mod constraint;
pub mod header;
pub mod lexer;


use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;

pub use constraint::BuildContext;

use crate::{Error, Result};

/// Pseudo-package that is always available and never resolved.
pub const UNSAFE_IMPORT: &str = "unsafe";

/// Pseudo-package for inline C code (cgo).
pub const CGO_IMPORT: &str = "C";

/// Header metadata for one Go source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub path: PathBuf,
    pub package: String,
    pub imports: IndexSet<String>,
    /// Whether the file participates in the build under the current context.
    pub matched: bool,
}

impl SourceInfo {
    /// Imports that must be provided by an archive.
    pub fn resolvable_imports(&self) -> impl Iterator<Item = &str> {
        self.imports
            .iter()
            .map(String::as_str)
            .filter(|imp| *imp != UNSAFE_IMPORT)
    }
}

/// Reads and inspects a source file.
pub fn inspect(path: &Path, ctx: &BuildContext) -> Result<SourceInfo> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    inspect_source(path, &text, ctx)
}

/// Inspects already-loaded source text. `path` is used for file-name
/// constraints and error messages.
pub fn inspect_source(path: &Path, text: &str, ctx: &BuildContext) -> Result<SourceInfo> {
    let parse_error = |message: String| Error::Parse {
        path: path.to_path_buf(),
        message,
    };

    let header = header::parse_header(text).map_err(parse_error)?;
    let name_matches = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| ctx.match_file_name(name));
    let matched = name_matches && ctx.match_header(text).map_err(parse_error)?;

    if matched && header.imports.contains(CGO_IMPORT) {
        return Err(Error::UnsupportedFeature {
            path: path.to_path_buf(),
            feature: "cgo",
        });
    }

    Ok(SourceInfo {
        path: path.to_path_buf(),
        package: header.package,
        imports: header.imports,
        matched,
    })
}
