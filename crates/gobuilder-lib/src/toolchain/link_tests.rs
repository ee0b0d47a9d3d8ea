use std::path::PathBuf;

use tempfile::TempDir;

use crate::Error;
use crate::deps::Dependency;
use crate::importcfg::ImportcfgManager;
use crate::test_utils::{RecordingExecutor, write_file};
use crate::toolchain::{LinkRequest, Toolchain, ToolchainConfig};

fn parse_deps(deps: &[&str]) -> Vec<Dependency> {
    deps.iter().map(|d| d.parse().unwrap()).collect()
}

fn setup() -> (TempDir, Toolchain<RecordingExecutor>) {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "std.importcfg",
        "packagefile fmt=/goroot/pkg/fmt.a\npackagefile runtime=/goroot/pkg/runtime.a\n",
    );
    let toolchain = Toolchain::with_executor(
        ToolchainConfig::default(),
        ImportcfgManager::default(),
        RecordingExecutor::new(),
    );
    (dir, toolchain)
}

fn request(dir: &TempDir, deps: &[&str]) -> LinkRequest {
    LinkRequest {
        std_importcfg: dir.path().join("std.importcfg"),
        main_archive: PathBuf::from("main%/libmain.a"),
        deps: parse_deps(deps),
        output: PathBuf::from("out/prog"),
        ..LinkRequest::default()
    }
}

#[test]
fn link_arguments() {
    let (dir, toolchain) = setup();
    let request = request(
        &dir,
        &["example.com/b=b%/example.com/libb.a", "example.com/a=a%/example.com/liba.a"],
    );

    toolchain.link(&request).unwrap();

    insta::assert_snapshot!(
        toolchain.executor().rendered(dir.path()),
        @"gccgo -o out/prog -L a%/example.com -L b%/example.com main%/libmain.a -la -lb"
    );
}

#[test]
fn dependency_order_does_not_matter() {
    let deps = ["example.com/b=b%/example.com/libb.a", "example.com/a=a%/example.com/liba.a"];
    let reversed = [deps[1], deps[0]];

    let (dir, forward) = setup();
    forward.link(&request(&dir, &deps)).unwrap();
    let (dir2, backward) = setup();
    backward.link(&request(&dir2, &reversed)).unwrap();

    let forward = forward.executor().rendered(dir.path());
    assert_eq!(forward, backward.executor().rendered(dir2.path()));
    assert_eq!(forward.matches("-L ").count(), 2);
    assert_eq!(forward.matches(" -la").count(), 1);
    assert_eq!(forward.matches(" -lb").count(), 1);
}

#[test]
fn freestanding_with_linker_script() {
    let (dir, toolchain) = setup();
    let mut request = request(&dir, &["example.com/a=a%/example.com/liba.a"]);
    request.freestanding = true;
    request.linker_script = Some(PathBuf::from("kernel.ld"));

    toolchain.link(&request).unwrap();

    insta::assert_snapshot!(
        toolchain.executor().rendered(dir.path()),
        @"gccgo -o out/prog -nostdlib -T kernel.ld -L a%/example.com main%/libmain.a -la"
    );
}

#[test]
fn replaced_dependency_is_skipped() {
    let (dir, toolchain) = setup();
    let request = request(
        &dir,
        &[
            "runtime=std%/libruntime.a",
            "github.com/iansmith/parigot/src/go/runtime=rt%/github.com/iansmith/parigot/src/go/libruntime.a",
        ],
    );

    toolchain.link(&request).unwrap();

    insta::assert_snapshot!(
        toolchain.executor().rendered(dir.path()),
        @"gccgo -o out/prog -L rt%/github.com/iansmith/parigot/src/go main%/libmain.a -lruntime"
    );
}

#[test]
fn object_dependencies_follow_main_archive() {
    let (dir, toolchain) = setup();
    let request = request(
        &dir,
        &["example.com/a=a%/example.com/liba.a", "start.o", "example.com/c=gen/c.o"],
    );

    toolchain.link(&request).unwrap();

    insta::assert_snapshot!(
        toolchain.executor().rendered(dir.path()),
        @"gccgo -o out/prog -L a%/example.com main%/libmain.a start.o gen/c.o -la"
    );
}

#[test]
fn transitive_dependencies_add_no_link_arguments() {
    let (dir, toolchain) = setup();
    let mut request = request(&dir, &["example.com/a=a%/example.com/liba.a"]);
    request.transitive_deps = parse_deps(&["example.com/z=z%/example.com/libz.a"]);

    toolchain.link(&request).unwrap();

    let rendered = toolchain.executor().rendered(dir.path());
    assert!(!rendered.contains("-lz"));
    assert!(!rendered.contains("z%"));
}

#[test]
fn conflicting_transitive_archive() {
    let (dir, toolchain) = setup();
    let mut request = request(&dir, &["example.com/a=a%/example.com/liba.a"]);
    request.transitive_deps = parse_deps(&["example.com/a=elsewhere/liba.a"]);

    let err = toolchain.link(&request).unwrap_err();

    assert!(matches!(err, Error::Argument(_)));
    assert!(toolchain.executor().invocations().is_empty());
}

#[test]
fn library_must_follow_naming_scheme() {
    let (dir, toolchain) = setup();
    let request = request(&dir, &["example.com/x=out/x.a"]);

    let err = toolchain.link(&request).unwrap_err();

    insta::assert_snapshot!(err.to_string(), @r#"out/x.a: library archive for "example.com/x" is not named lib<name>.a"#);
    assert!(toolchain.executor().invocations().is_empty());
}

#[test]
fn missing_std_importcfg() {
    let (dir, toolchain) = setup();
    let mut request = request(&dir, &[]);
    request.std_importcfg = dir.path().join("missing.importcfg");

    let err = toolchain.link(&request).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn link_importcfg_includes_transitive_closure() {
    let (dir, toolchain) = setup();
    let mut request = request(&dir, &["example.com/a=a%/example.com/liba.a", "start.o"]);
    request.transitive_deps = parse_deps(&["example.com/z=z%/example.com/libz.a"]);

    let importcfg = toolchain.link_importcfg(&request).unwrap();

    insta::assert_snapshot!(importcfg.render(), @r"
    packagefile example.com/a=a%/example.com/liba.a
    packagefile example.com/z=z%/example.com/libz.a
    packagefile fmt=/goroot/pkg/fmt.a
    ");
}

#[test]
fn link_importcfg_substituted_runtime() {
    let (dir, toolchain) = setup();
    let request = request(
        &dir,
        &[
            "runtime=std%/libruntime.a",
            "github.com/iansmith/parigot/src/go/runtime=rt%/github.com/iansmith/parigot/src/go/libruntime.a",
        ],
    );

    let importcfg = toolchain.link_importcfg(&request).unwrap();

    insta::assert_snapshot!(importcfg.render(), @r"
    packagefile fmt=/goroot/pkg/fmt.a
    packagefile runtime=rt%/github.com/iansmith/parigot/src/go/libruntime.a
    ");
}

#[test]
fn link_importcfg_direct_overrides_std() {
    let (dir, toolchain) = setup();
    let request = request(&dir, &["fmt=vendor%/libfmt.a"]);

    let importcfg = toolchain.link_importcfg(&request).unwrap();

    insta::assert_snapshot!(importcfg.render(), @"packagefile fmt=vendor%/libfmt.a");
}
