//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! This module contains:
//! - `GlobalParams`, the toolchain flags shared by every subcommand
//! - `*Params` structs that mirror command `*Args` but are populated from clap
//! - `Into<*Args>` impls to bridge dispatch → command handlers

use std::path::PathBuf;
use std::sync::Arc;

use clap::ArgMatches;
use gobuilder_lib::importcfg::{Substitution, SubstitutionTable};
use gobuilder_lib::{Dependency, ImportcfgManager, Toolchain, ToolchainConfig};

use crate::commands::archive_path::ArchivePathArgs;
use crate::commands::asm::AsmArgs;
use crate::commands::compile::CompileArgs;
use crate::commands::link::LinkArgs;
use crate::commands::stdimportcfg::StdimportcfgArgs;

pub struct GlobalParams {
    pub config: ToolchainConfig,
    pub substitutes: Vec<Substitution>,
    pub verbosity: u8,
}

impl GlobalParams {
    /// Reads global flags. `m` must be the subcommand's matches, where
    /// globals given after the subcommand name are visible.
    pub fn from_matches(m: &ArgMatches) -> Self {
        let mut config = ToolchainConfig {
            goos: m.get_one::<String>("goos").cloned(),
            goarch: m.get_one::<String>("goarch").cloned(),
            tags: get_many(m, "tags"),
            ..ToolchainConfig::default()
        };
        if let Some(gccgo) = m.get_one::<PathBuf>("gccgo") {
            config.gccgo = gccgo.clone();
        }
        if let Some(ar) = m.get_one::<PathBuf>("ar") {
            config.ar = ar.clone();
        }
        if let Some(go) = m.get_one::<PathBuf>("go") {
            config.go = go.clone();
        }
        if let Some(release) = m.get_one::<u32>("go_version") {
            config.go_release = *release;
        }

        Self {
            config,
            substitutes: get_many(m, "substitute"),
            verbosity: m.get_count("verbose"),
        }
    }

    pub fn toolchain(&self) -> gobuilder_lib::Result<Toolchain> {
        let table = SubstitutionTable::builtin().extended(self.substitutes.iter().cloned())?;
        Ok(Toolchain::new(
            self.config.clone(),
            ImportcfgManager::new(Arc::new(table)),
        ))
    }
}

pub struct CompileParams {
    pub sources: Vec<PathBuf>,
    pub stdimportcfg: PathBuf,
    pub deps: Vec<Dependency>,
    pub package_path: Option<String>,
    pub output: PathBuf,
    pub archive: PathBuf,
    pub extra_objects: Vec<PathBuf>,
}

impl CompileParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            sources: get_many(m, "sources"),
            stdimportcfg: get_path(m, "stdimportcfg"),
            deps: get_many(m, "dep"),
            package_path: m.get_one::<String>("package_path").cloned(),
            output: get_path(m, "output"),
            archive: get_path(m, "archive"),
            extra_objects: get_many(m, "extra_obj"),
        }
    }
}

impl From<CompileParams> for CompileArgs {
    fn from(p: CompileParams) -> Self {
        Self {
            sources: p.sources,
            stdimportcfg: p.stdimportcfg,
            deps: p.deps,
            package_path: p.package_path,
            output: p.output,
            archive: p.archive,
            extra_objects: p.extra_objects,
        }
    }
}

pub struct AsmParams {
    pub sources: Vec<PathBuf>,
    pub package_path: Option<String>,
    pub include_dir: Option<PathBuf>,
    pub output: PathBuf,
}

impl AsmParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            sources: get_many(m, "sources"),
            package_path: m.get_one::<String>("package_path").cloned(),
            include_dir: m.get_one::<PathBuf>("include_dir").cloned(),
            output: get_path(m, "output"),
        }
    }
}

impl From<AsmParams> for AsmArgs {
    fn from(p: AsmParams) -> Self {
        Self {
            sources: p.sources,
            package_path: p.package_path,
            include_dir: p.include_dir,
            output: p.output,
        }
    }
}

pub struct LinkParams {
    pub stdimportcfg: PathBuf,
    pub main: PathBuf,
    pub output: PathBuf,
    pub deps: Vec<Dependency>,
    pub transitive_deps: Vec<Dependency>,
    pub linker_script: Option<PathBuf>,
    pub freestanding: bool,
}

impl LinkParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            stdimportcfg: get_path(m, "stdimportcfg"),
            main: get_path(m, "main"),
            output: get_path(m, "output"),
            deps: get_many(m, "dep"),
            transitive_deps: get_many(m, "transitive_dep"),
            linker_script: m.get_one::<PathBuf>("linker_script").cloned(),
            freestanding: m.get_flag("freestanding"),
        }
    }
}

impl From<LinkParams> for LinkArgs {
    fn from(p: LinkParams) -> Self {
        Self {
            stdimportcfg: p.stdimportcfg,
            main: p.main,
            output: p.output,
            deps: p.deps,
            transitive_deps: p.transitive_deps,
            linker_script: p.linker_script,
            freestanding: p.freestanding,
        }
    }
}

pub struct StdimportcfgParams {
    pub output: PathBuf,
}

impl StdimportcfgParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            output: get_path(m, "output"),
        }
    }
}

impl From<StdimportcfgParams> for StdimportcfgArgs {
    fn from(p: StdimportcfgParams) -> Self {
        Self { output: p.output }
    }
}

pub struct ArchivePathParams {
    pub target: String,
    pub import_path: String,
    pub search_dir: bool,
}

impl ArchivePathParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            target: m.get_one::<String>("target").cloned().unwrap_or_default(),
            import_path: m
                .get_one::<String>("import_path")
                .cloned()
                .unwrap_or_default(),
            search_dir: m.get_flag("search_dir"),
        }
    }
}

impl From<ArchivePathParams> for ArchivePathArgs {
    fn from(p: ArchivePathParams) -> Self {
        Self {
            target: p.target,
            import_path: p.import_path,
            search_dir: p.search_dir,
        }
    }
}

/// Required path args are enforced by clap; an empty path never reaches a command.
fn get_path(m: &ArgMatches, id: &str) -> PathBuf {
    m.get_one::<PathBuf>(id).cloned().unwrap_or_default()
}

fn get_many<T: Clone + Send + Sync + 'static>(m: &ArgMatches, id: &str) -> Vec<T> {
    m.get_many::<T>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}
