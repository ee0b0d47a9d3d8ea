use std::path::PathBuf;

use gobuilder_lib::toolchain::LinkRequest;
use gobuilder_lib::{Dependency, Result, Toolchain};

pub struct LinkArgs {
    pub stdimportcfg: PathBuf,
    pub main: PathBuf,
    pub output: PathBuf,
    pub deps: Vec<Dependency>,
    pub transitive_deps: Vec<Dependency>,
    pub linker_script: Option<PathBuf>,
    pub freestanding: bool,
}

pub fn run(args: LinkArgs, toolchain: &Toolchain) -> Result<()> {
    let request = LinkRequest {
        std_importcfg: args.stdimportcfg,
        main_archive: args.main,
        deps: args.deps,
        transitive_deps: args.transitive_deps,
        output: args.output,
        linker_script: args.linker_script,
        freestanding: args.freestanding,
    };
    toolchain.link(&request)
}
