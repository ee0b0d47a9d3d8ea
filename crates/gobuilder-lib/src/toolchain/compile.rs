use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{Executor, Invocation, Toolchain};
use crate::deps::{self, Dependency};
use crate::importcfg::Importcfg;
use crate::naming;
use crate::source::{self, SourceInfo};
use crate::{Error, Result};

/// Inputs for compiling one package into an object and an archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileRequest {
    /// `.go` files to inspect and `.o` files to pass through.
    pub sources: Vec<PathBuf>,
    pub std_importcfg: PathBuf,
    pub deps: Vec<Dependency>,
    /// Import path of the package being built; `None` for `main`.
    pub package_path: Option<String>,
    pub output_object: PathBuf,
    pub output_archive: PathBuf,
    /// Objects archived after the primary object.
    pub extra_objects: Vec<PathBuf>,
}

enum SourceKind {
    Go,
    Object,
}

fn source_kind(path: &Path) -> Result<SourceKind> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("go") => Ok(SourceKind::Go),
        Some("o") => Ok(SourceKind::Object),
        _ => Err(Error::Argument(format!(
            "{}: unsupported source file, expected .go or .o",
            path.display()
        ))),
    }
}

impl<E: Executor> Toolchain<E> {
    /// Compiles Go sources into `output_object`, then archives it.
    ///
    /// Every import of every matched source must resolve before any tool
    /// runs.
    pub fn compile(&self, request: &CompileRequest) -> Result<()> {
        let ctx = self.config.build_context();
        let mut go_sources = Vec::new();
        let mut raw_inputs = Vec::new();
        for path in &request.sources {
            match source_kind(path)? {
                SourceKind::Object => raw_inputs.push(path.clone()),
                SourceKind::Go => {
                    let info = source::inspect(path, &ctx)?;
                    if info.matched {
                        go_sources.push(info);
                    } else {
                        log::debug!("{}: excluded by build constraints", path.display());
                    }
                }
            }
        }
        if go_sources.is_empty() {
            return Err(Error::Argument(
                "no Go source files match the build context".to_owned(),
            ));
        }

        let resolution = deps::resolve(&request.deps)?;
        raw_inputs.extend(resolution.raw_inputs);

        let std = Importcfg::read(&request.std_importcfg)?;
        let merged = self
            .importcfg
            .merge(&std, &resolution.libraries.to_importcfg());
        let imported = self.imported_packages(&go_sources, &merged)?;
        let scratch = self.importcfg.write_scratch(&imported)?;
        log::debug!("compile importcfg:\n{}", imported.render());

        let mut importcfg_flag = OsString::from("-fgo-importcfg=");
        importcfg_flag.push(scratch.path());

        let mut compile =
            Invocation::new(&self.config.gccgo).args(["-c", "-g", "-gno-record-gcc-switches"]);
        for root in include_roots(&resolution.libraries) {
            compile = compile.arg("-I").arg(root);
        }
        compile = compile
            .arg(importcfg_flag)
            .arg("-o")
            .arg(&request.output_object);
        if let Some(package_path) = request.package_path.as_deref().filter(|p| !p.is_empty()) {
            let package_path = self.importcfg.table().resolve(package_path);
            compile = compile.arg(format!("-fgo-pkgpath={package_path}"));
        }
        compile = compile
            .args(go_sources.iter().map(|info| &info.path))
            .args(&raw_inputs);
        self.executor.run(&compile)?;
        drop(scratch);

        remove_stale(&request.output_archive)?;
        let archive = Invocation::new(&self.config.ar)
            .arg("rcD")
            .arg(&request.output_archive)
            .arg(&request.output_object)
            .args(&request.extra_objects);
        self.executor.run(&archive)
    }

    /// The merged mapping restricted to what `sources` import.
    fn imported_packages(&self, sources: &[SourceInfo], merged: &Importcfg) -> Result<Importcfg> {
        let table = self.importcfg.table();
        let mut imported = Importcfg::new();
        for info in sources {
            for import in info.resolvable_imports() {
                let resolved = table.resolve(import);
                let Some(archive) = merged.get(resolved) else {
                    return Err(Error::UnresolvedImport {
                        path: info.path.clone(),
                        import: import.to_owned(),
                    });
                };
                imported.insert(resolved, archive);
            }
        }
        Ok(imported)
    }
}

/// Include roots of every scheme-named library, deduplicated, in import-path order.
fn include_roots(libraries: &deps::DependencySet) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();
    for archive in libraries.sorted() {
        if let Some(root) = naming::include_root(&archive.path, &archive.import_path)
            && !roots.contains(&root)
        {
            roots.push(root);
        }
    }
    roots
}

fn remove_stale(archive: &Path) -> Result<()> {
    match fs::remove_file(archive) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(Error::io(archive, e)),
        _ => Ok(()),
    }
}
