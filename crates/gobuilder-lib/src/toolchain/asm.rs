use std::fmt::Write as _;
use std::path::PathBuf;

use super::{Executor, Invocation, Toolchain};
use crate::{Error, Result};

/// Inputs for assembling `.s` files into one object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsmRequest {
    pub sources: Vec<PathBuf>,
    /// Import path the object's symbols belong to; `None` for `main`.
    pub package_path: Option<String>,
    pub include_dir: Option<PathBuf>,
    pub output: PathBuf,
}

impl<E: Executor> Toolchain<E> {
    /// Assembles through the C preprocessor, defining `GOPKGPATH` for the sources.
    pub fn assemble(&self, request: &AsmRequest) -> Result<()> {
        if request.sources.is_empty() {
            return Err(Error::Argument("no assembly sources given".to_owned()));
        }
        let package_path = request
            .package_path
            .as_deref()
            .map(|p| self.importcfg.table().resolve(p))
            .unwrap_or_default();

        let mut asm = Invocation::new(&self.config.gccgo).args(["-xassembler-with-cpp", "-c"]);
        if let Some(dir) = &request.include_dir {
            asm = asm.arg("-I").arg(dir);
        }
        asm = asm
            .arg("-o")
            .arg(&request.output)
            .arg("-D")
            .arg(format!("GOPKGPATH={}", pkgpath_token(package_path)))
            .args(&request.sources)
            .env("GOARCH", self.config.build_context().goarch);
        self.executor.run(&asm)
    }
}

/// Package path used for assembly in a main package.
const MAIN_PKGPATH: &str = "go.welcome";

/// Encodes an import path as a preprocessor-safe symbol prefix.
///
/// `.` becomes `_0`, `/` becomes `_1`, `-` becomes `_2`, and any other byte
/// outside `[A-Za-z0-9_]` becomes `_x` and two hex digits.
///
/// A main package has no import path; its assembly symbols use the
/// `go.welcome` prefix, encoded as `go_0welcome`.
pub fn pkgpath_token(package_path: &str) -> String {
    let package_path = match package_path {
        "" => MAIN_PKGPATH,
        path => path,
    };
    let mut token = String::with_capacity(package_path.len());
    for byte in package_path.bytes() {
        match byte {
            b'.' => token.push_str("_0"),
            b'/' => token.push_str("_1"),
            b'-' => token.push_str("_2"),
            b if b.is_ascii_alphanumeric() || b == b'_' => token.push(char::from(b)),
            b => {
                let _ = write!(token, "_x{b:02x}");
            }
        }
    }
    token
}
