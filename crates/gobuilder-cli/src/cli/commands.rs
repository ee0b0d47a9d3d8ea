//! Command builders for the CLI.
//!
//! Each command is built using the shared arg builders from `args.rs`.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("builder")
        .about("Compile, assemble and link Go packages with gccgo")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(gccgo_arg())
        .arg(ar_arg())
        .arg(go_arg())
        .arg(goos_arg())
        .arg(goarch_arg())
        .arg(tags_arg())
        .arg(go_version_arg())
        .arg(substitute_arg())
        .arg(verbose_arg())
        .subcommand(compile_command())
        .subcommand(asm_command())
        .subcommand(link_command())
        .subcommand(stdimportcfg_command())
        .subcommand(archive_path_command())
}

/// Compile one package and archive it.
pub fn compile_command() -> Command {
    Command::new("compile")
        .about("Compile Go sources into an object and archive")
        .after_help(
            r#"EXAMPLES:
  builder compile --stdimportcfg std.importcfg -p example.com/foo \
      --dep example.com/bar=bar%/example.com/libbar.a \
      -o foo.o -l foo%/example.com/libfoo.a foo.go"#,
        )
        .arg(stdimportcfg_arg())
        .arg(dep_arg())
        .arg(package_path_arg())
        .arg(output_arg())
        .arg(archive_arg())
        .arg(extra_obj_arg())
        .arg(sources_arg())
}

/// Assemble `.s` files through the C preprocessor.
pub fn asm_command() -> Command {
    Command::new("asm")
        .about("Assemble sources into an object")
        .arg(package_path_arg())
        .arg(include_dir_arg())
        .arg(output_arg())
        .arg(sources_arg())
}

/// Link an executable.
pub fn link_command() -> Command {
    Command::new("link")
        .about("Link a main package archive into an executable")
        .arg(stdimportcfg_arg())
        .arg(main_archive_arg())
        .arg(output_arg())
        .arg(dep_arg())
        .arg(transitive_dep_arg())
        .arg(linker_script_arg())
        .arg(freestanding_arg())
}

/// Generate the standard library importcfg.
pub fn stdimportcfg_command() -> Command {
    Command::new("stdimportcfg")
        .about("Write the importcfg for the standard library")
        .arg(output_arg())
}

/// Print where a target's archive for an import path lives.
pub fn archive_path_command() -> Command {
    Command::new("archive-path")
        .about("Print the archive path for an import path")
        .arg(target_arg())
        .arg(import_path_arg())
        .arg(search_dir_arg())
}
