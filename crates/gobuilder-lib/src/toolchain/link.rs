use std::path::PathBuf;

use super::{Executor, Invocation, Toolchain};
use crate::deps::{self, Dependency, LibraryInfo, Resolution};
use crate::importcfg::Importcfg;
use crate::naming;
use crate::{Error, Result};

/// Inputs for linking a main archive into an executable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRequest {
    pub std_importcfg: PathBuf,
    pub main_archive: PathBuf,
    pub deps: Vec<Dependency>,
    /// Everything the direct dependencies themselves depend on.
    pub transitive_deps: Vec<Dependency>,
    pub output: PathBuf,
    pub linker_script: Option<PathBuf>,
    /// Link without the C runtime and standard libraries.
    pub freestanding: bool,
}

impl<E: Executor> Toolchain<E> {
    /// Links the main archive against its direct dependency archives.
    ///
    /// Search paths and `-l` names come from the direct dependencies only.
    /// The std + closure importcfg is still written and logged.
    pub fn link(&self, request: &LinkRequest) -> Result<()> {
        let resolution = self.resolve_direct(request)?;

        let merged = self.merged_importcfg(request, &resolution)?;
        let scratch = self.importcfg.write_scratch(&merged)?;
        log::debug!(
            "link importcfg {}:\n{}",
            scratch.path().display(),
            merged.render()
        );

        let sorted = resolution.libraries.sorted();
        let mut link_names = Vec::with_capacity(sorted.len());
        for archive in &sorted {
            let Some(name) = naming::link_name(&archive.path) else {
                return Err(Error::Argument(format!(
                    "{}: library archive for {:?} is not named lib<name>.a",
                    archive.path.display(),
                    archive.import_path
                )));
            };
            link_names.push(format!("-l{name}"));
        }

        let mut link = Invocation::new(&self.config.gccgo)
            .arg("-o")
            .arg(&request.output);
        if request.freestanding {
            link = link.arg("-nostdlib");
        }
        if let Some(script) = &request.linker_script {
            link = link.arg("-T").arg(script);
        }
        for archive in &sorted {
            link = link.arg("-L").arg(naming::search_dir(&archive.path));
        }
        link = link
            .arg(&request.main_archive)
            .args(&resolution.raw_inputs)
            .args(&link_names);
        self.executor.run(&link)
    }

    /// The std + closure importcfg for a link: transitive dependencies are
    /// merged in, replaced paths are dropped and direct entries win over std.
    pub fn link_importcfg(&self, request: &LinkRequest) -> Result<Importcfg> {
        let resolution = self.resolve_direct(request)?;
        self.merged_importcfg(request, &resolution)
    }

    /// Splits the direct dependencies, skipping those whose import path is
    /// replaced by a substitute.
    fn resolve_direct(&self, request: &LinkRequest) -> Result<Resolution> {
        let table = self.importcfg.table();
        let direct: Vec<&Dependency> = request
            .deps
            .iter()
            .filter(|dep| match dep.import_path.as_deref() {
                Some(import_path) if table.is_replaced(import_path) => {
                    log::debug!("skipping replaced dependency {import_path}");
                    false
                }
                _ => true,
            })
            .collect();
        deps::resolve(direct)
    }

    fn merged_importcfg(&self, request: &LinkRequest, direct: &Resolution) -> Result<Importcfg> {
        let libraries: Vec<LibraryInfo> = direct.libraries.iter().map(LibraryInfo::new).collect();
        let mut closure = deps::closure(&libraries)?;
        closure.union(&deps::resolve(&request.transitive_deps)?.libraries)?;

        let std = Importcfg::read(&request.std_importcfg)?;
        Ok(self.importcfg.merge(&std, &closure.to_importcfg()))
    }
}
