mod cli;
mod commands;

use cli::{
    ArchivePathParams, AsmParams, CompileParams, GlobalParams, LinkParams, StdimportcfgParams,
    build_cli,
};

fn main() {
    let matches = build_cli().get_matches();
    let Some((name, m)) = matches.subcommand() else {
        unreachable!("clap should have caught this")
    };

    let global = GlobalParams::from_matches(m);
    init_logging(global.verbosity);
    let result = global.toolchain().and_then(|toolchain| match name {
        "compile" => commands::compile::run(CompileParams::from_matches(m).into(), &toolchain),
        "asm" => commands::asm::run(AsmParams::from_matches(m).into(), &toolchain),
        "link" => commands::link::run(LinkParams::from_matches(m).into(), &toolchain),
        "stdimportcfg" => {
            commands::stdimportcfg::run(StdimportcfgParams::from_matches(m).into(), &toolchain)
        }
        "archive-path" => commands::archive_path::run(ArchivePathParams::from_matches(m).into()),
        _ => unreachable!("clap should have caught this"),
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Warnings by default; each `-v` raises the level. `RUST_LOG` overrides.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::builder()
        .filter_level(level)
        .format_target(false)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}
