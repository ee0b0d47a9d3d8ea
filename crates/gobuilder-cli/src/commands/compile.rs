use std::path::PathBuf;

use gobuilder_lib::toolchain::CompileRequest;
use gobuilder_lib::{Dependency, Result, Toolchain};

pub struct CompileArgs {
    pub sources: Vec<PathBuf>,
    pub stdimportcfg: PathBuf,
    pub deps: Vec<Dependency>,
    pub package_path: Option<String>,
    pub output: PathBuf,
    pub archive: PathBuf,
    pub extra_objects: Vec<PathBuf>,
}

pub fn run(args: CompileArgs, toolchain: &Toolchain) -> Result<()> {
    let request = CompileRequest {
        sources: args.sources,
        std_importcfg: args.stdimportcfg,
        deps: args.deps,
        package_path: args.package_path,
        output_object: args.output,
        output_archive: args.archive,
        extra_objects: args.extra_objects,
    };
    toolchain.compile(&request)
}
