use std::path::PathBuf;

use gobuilder_lib::toolchain::AsmRequest;
use gobuilder_lib::{Result, Toolchain};

pub struct AsmArgs {
    pub sources: Vec<PathBuf>,
    pub package_path: Option<String>,
    pub include_dir: Option<PathBuf>,
    pub output: PathBuf,
}

pub fn run(args: AsmArgs, toolchain: &Toolchain) -> Result<()> {
    let request = AsmRequest {
        sources: args.sources,
        package_path: args.package_path,
        include_dir: args.include_dir,
        output: args.output,
    };
    toolchain.assemble(&request)
}
