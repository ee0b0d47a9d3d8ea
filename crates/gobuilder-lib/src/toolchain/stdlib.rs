use std::path::Path;

use serde::Deserialize;

use super::{Executor, Invocation, Toolchain};
use crate::importcfg::Importcfg;
use crate::{Error, Result};

/// The fields of a `go list -json` record this driver reads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListedPackage {
    import_path: String,
    #[serde(default)]
    standard: bool,
    #[serde(default)]
    target: String,
}

impl<E: Executor> Toolchain<E> {
    /// Writes the standard library importcfg to `output`.
    ///
    /// `go list` runs against a private, throwaway build cache so results do
    /// not depend on the caller's environment.
    pub fn generate_std_importcfg(&self, output: &Path) -> Result<()> {
        let cache = tempfile::Builder::new()
            .prefix("gocache")
            .tempdir()
            .map_err(|e| Error::io(std::env::temp_dir(), e))?;

        let mut list = Invocation::new(&self.config.go)
            .args(["list", "-json", "std"])
            .env("GOCACHE", cache.path());
        if let Some(goos) = &self.config.goos {
            list = list.env("GOOS", goos);
        }
        if let Some(goarch) = &self.config.goarch {
            list = list.env("GOARCH", goarch);
        }

        let stdout = self.executor.output(&list)?;
        let cfg = parse_package_list(&stdout).map_err(|source| Error::ToolOutput {
            program: self.config.go.clone(),
            source,
        })?;
        log::debug!("{} standard packages", cfg.len());
        self.importcfg.write(&cfg, output)
    }
}

/// Decodes a stream of concatenated `go list -json` objects.
fn parse_package_list(stdout: &[u8]) -> serde_json::Result<Importcfg> {
    let mut cfg = Importcfg::new();
    for package in serde_json::Deserializer::from_slice(stdout).into_iter::<ListedPackage>() {
        let package = package?;
        if package.standard && !package.target.is_empty() {
            cfg.insert(package.import_path, package.target);
        }
    }
    Ok(cfg)
}
