use std::path::PathBuf;

use gobuilder_lib::{Result, Toolchain};

pub struct StdimportcfgArgs {
    pub output: PathBuf,
}

pub fn run(args: StdimportcfgArgs, toolchain: &Toolchain) -> Result<()> {
    toolchain.generate_std_importcfg(&args.output)
}
