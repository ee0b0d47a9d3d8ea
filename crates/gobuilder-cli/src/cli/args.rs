//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.
//! Toolchain flags are global so they may follow the subcommand name.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};
use gobuilder_lib::Dependency;
use gobuilder_lib::importcfg::Substitution;

/// Path to the gccgo driver (--gccgo).
pub fn gccgo_arg() -> Arg {
    Arg::new("gccgo")
        .long("gccgo")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .default_value("gccgo")
        .global(true)
        .help("Compiler, assembler and linker driver")
}

/// Path to the archiver (--ar).
pub fn ar_arg() -> Arg {
    Arg::new("ar")
        .long("ar")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .default_value("ar")
        .global(true)
        .help("Archiver")
}

/// Path to the go command (--go).
pub fn go_arg() -> Arg {
    Arg::new("go")
        .long("go")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .default_value("go")
        .global(true)
        .help("Go command, used to list the standard library")
}

/// Target OS (--goos).
pub fn goos_arg() -> Arg {
    Arg::new("goos")
        .long("goos")
        .value_name("OS")
        .global(true)
        .help("Target operating system (host if not specified)")
}

/// Target architecture (--goarch).
pub fn goarch_arg() -> Arg {
    Arg::new("goarch")
        .long("goarch")
        .value_name("ARCH")
        .global(true)
        .help("Target architecture (host if not specified)")
}

/// Extra build tags (--tags a,b).
pub fn tags_arg() -> Arg {
    Arg::new("tags")
        .long("tags")
        .value_name("TAGS")
        .value_delimiter(',')
        .action(ArgAction::Append)
        .global(true)
        .help("Comma-separated build tags")
}

/// Newest satisfied release tag (--go-version).
pub fn go_version_arg() -> Arg {
    Arg::new("go_version")
        .long("go-version")
        .value_name("VERSION")
        .value_parser(parse_go_release)
        .global(true)
        .help("Newest satisfied release tag, e.g. go1.22")
}

/// Extra package substitution (--substitute custom=replaced).
pub fn substitute_arg() -> Arg {
    Arg::new("substitute")
        .long("substitute")
        .value_name("CUSTOM=REPLACED")
        .value_parser(|s: &str| s.parse::<Substitution>().map_err(|e| e.to_string()))
        .action(ArgAction::Append)
        .global(true)
        .help("Build CUSTOM in place of the standard package REPLACED")
}

/// Log verbosity (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .global(true)
        .help("Log tool invocations (-vv for importcfg contents)")
}

/// Standard library importcfg (--stdimportcfg).
pub fn stdimportcfg_arg() -> Arg {
    Arg::new("stdimportcfg")
        .long("stdimportcfg")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("Importcfg for the standard library")
}

/// Direct dependency (--dep importpath=file).
pub fn dep_arg() -> Arg {
    Arg::new("dep")
        .long("dep")
        .visible_alias("arc")
        .value_name("IMPORTPATH=FILE")
        .value_parser(parse_dependency)
        .action(ArgAction::Append)
        .help("Direct dependency archive or object")
}

/// Transitive dependency (--transitive-dep importpath=file).
pub fn transitive_dep_arg() -> Arg {
    Arg::new("transitive_dep")
        .long("transitive-dep")
        .value_name("IMPORTPATH=FILE")
        .value_parser(parse_dependency)
        .action(ArgAction::Append)
        .help("Dependency of a direct dependency")
}

/// Import path of the package being built (-p).
pub fn package_path_arg() -> Arg {
    Arg::new("package_path")
        .short('p')
        .long("package-path")
        .value_name("IMPORTPATH")
        .help("Import path of the package (main if not specified)")
}

/// Output file (-o).
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("Output file")
}

/// Output archive (-l/--archive).
pub fn archive_arg() -> Arg {
    Arg::new("archive")
        .short('l')
        .long("archive")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("Output archive")
}

/// Objects to add to the archive (-a/--extra-obj a.o,b.o).
pub fn extra_obj_arg() -> Arg {
    Arg::new("extra_obj")
        .short('a')
        .long("extra-obj")
        .value_name("FILES")
        .value_parser(value_parser!(PathBuf))
        .value_delimiter(',')
        .action(ArgAction::Append)
        .help("Comma-separated objects archived after the compiled object")
}

/// Input files (positional).
pub fn sources_arg() -> Arg {
    Arg::new("sources")
        .value_name("SOURCES")
        .value_parser(value_parser!(PathBuf))
        .num_args(1..)
        .required(true)
        .help("Source files")
}

/// Preprocessor include directory (-I).
pub fn include_dir_arg() -> Arg {
    Arg::new("include_dir")
        .short('I')
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .help("Include directory for the preprocessor")
}

/// Main package archive (--main).
pub fn main_archive_arg() -> Arg {
    Arg::new("main")
        .long("main")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("Archive of the main package")
}

/// Linker script (-T).
pub fn linker_script_arg() -> Arg {
    Arg::new("linker_script")
        .short('T')
        .long("linker-script")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Linker script")
}

/// Link without the C runtime (--freestanding).
pub fn freestanding_arg() -> Arg {
    Arg::new("freestanding")
        .long("freestanding")
        .action(ArgAction::SetTrue)
        .help("Link with -nostdlib")
}

/// Build target name (--target).
pub fn target_arg() -> Arg {
    Arg::new("target")
        .long("target")
        .value_name("NAME")
        .required(true)
        .help("Build target that owns the archive")
}

/// Import path (positional).
pub fn import_path_arg() -> Arg {
    Arg::new("import_path")
        .value_name("IMPORTPATH")
        .required(true)
        .help("Import path of the package")
}

/// Print the linker search directory instead (--search-dir).
pub fn search_dir_arg() -> Arg {
    Arg::new("search_dir")
        .long("search-dir")
        .action(ArgAction::SetTrue)
        .help("Print the linker search directory instead of the archive")
}

fn parse_dependency(s: &str) -> Result<Dependency, String> {
    s.parse::<Dependency>().map_err(|e| e.to_string())
}

/// Accepts `go1.22`, `1.22` or `22`.
fn parse_go_release(s: &str) -> Result<u32, String> {
    let minor = s.strip_prefix("go").unwrap_or(s);
    let minor = minor.strip_prefix("1.").unwrap_or(minor);
    minor
        .parse()
        .map_err(|_| format!("invalid Go version {s:?}: expected go1.N"))
}
