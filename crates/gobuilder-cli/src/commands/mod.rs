pub mod archive_path;
pub mod asm;
pub mod compile;
pub mod link;
pub mod stdimportcfg;
