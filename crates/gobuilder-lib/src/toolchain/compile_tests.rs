use std::path::{Path, PathBuf};

use indoc::indoc;
use tempfile::TempDir;

use crate::Error;
use crate::deps::Dependency;
use crate::importcfg::ImportcfgManager;
use crate::test_utils::{RecordingExecutor, write_file};
use crate::toolchain::{CompileRequest, Toolchain, ToolchainConfig};

const STD_IMPORTCFG: &str = indoc! {"
    packagefile fmt=/goroot/pkg/fmt.a
    packagefile os=/goroot/pkg/os.a
    packagefile runtime=/goroot/pkg/runtime.a
"};

const FOO_GO: &str = indoc! {r#"
    // Package foo says hello.
    package foo

    import (
    	"fmt"
    	"unsafe"

    	"example.com/bar"
    )

    func Hello() { fmt.Println(bar.Name, unsafe.Sizeof(0)) }
"#};

struct Fixture {
    dir: TempDir,
    toolchain: Toolchain<RecordingExecutor>,
}

impl Fixture {
    fn new() -> Self {
        Self::with_executor(RecordingExecutor::new())
    }

    fn with_executor(executor: RecordingExecutor) -> Self {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "std.importcfg", STD_IMPORTCFG);
        let config = ToolchainConfig {
            goos: Some("linux".to_owned()),
            goarch: Some("arm64".to_owned()),
            ..ToolchainConfig::default()
        };
        let toolchain = Toolchain::with_executor(config, ImportcfgManager::default(), executor);
        Self { dir, toolchain }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn source(&self, name: &str, text: &str) -> PathBuf {
        write_file(self.root(), name, text)
    }

    fn request(&self, sources: Vec<PathBuf>, deps: &[&str]) -> CompileRequest {
        CompileRequest {
            sources,
            std_importcfg: self.root().join("std.importcfg"),
            deps: deps.iter().map(|d| d.parse::<Dependency>().unwrap()).collect(),
            package_path: Some("example.com/foo".to_owned()),
            output_object: self.root().join("out/foo.o"),
            output_archive: self.root().join("out/foo%/example.com/libfoo.a"),
            extra_objects: Vec::new(),
        }
    }

    fn rendered(&self) -> String {
        self.toolchain.executor().rendered(self.root())
    }

    fn importcfgs(&self) -> Vec<String> {
        self.toolchain.executor().importcfgs()
    }
}

#[test]
fn compile_then_archive() {
    let fx = Fixture::new();
    let foo = fx.source("src/foo.go", FOO_GO);
    let request = fx.request(vec![foo], &["example.com/bar=bar%/example.com/libbar.a"]);

    fx.toolchain.compile(&request).unwrap();

    insta::assert_snapshot!(fx.rendered(), @r"
    gccgo -c -g -gno-record-gcc-switches -I bar% -fgo-importcfg=<scratch> -o out/foo.o -fgo-pkgpath=example.com/foo src/foo.go
    ar rcD out/foo%/example.com/libfoo.a out/foo.o
    ");
    let importcfgs = fx.importcfgs();
    insta::assert_snapshot!(importcfgs[0].as_str(), @r"
    packagefile example.com/bar=bar%/example.com/libbar.a
    packagefile fmt=/goroot/pkg/fmt.a
    ");
}

#[test]
fn excluded_files_are_not_compiled() {
    let fx = Fixture::new();
    let foo = fx.source("src/foo.go", "package foo\n");
    let windows = fx.source("src/foo_windows.go", "package foo\n");
    let ignored = fx.source("src/gen.go", "//go:build ignore\n\npackage main\n");
    let request = fx.request(vec![foo, windows, ignored], &[]);

    fx.toolchain.compile(&request).unwrap();

    let invocations = fx.toolchain.executor().invocations();
    assert_eq!(invocations.len(), 2);
    let compiled: Vec<_> = invocations[0]
        .args
        .iter()
        .filter(|arg| arg.to_string_lossy().ends_with(".go"))
        .collect();
    assert_eq!(compiled.len(), 1);
    assert!(compiled[0].to_string_lossy().ends_with("src/foo.go"));
}

#[test]
fn cgo_source_is_rejected_before_any_tool_runs() {
    let fx = Fixture::new();
    let foo = fx.source("src/foo.go", "package foo\n");
    let cgo = fx.source("src/cgo.go", "package foo\n\nimport \"C\"\n");
    let request = fx.request(vec![foo, cgo.clone()], &[]);

    let err = fx.toolchain.compile(&request).unwrap_err();

    assert!(matches!(&err, Error::UnsupportedFeature { path, feature: "cgo" } if *path == cgo));
    assert!(fx.toolchain.executor().invocations().is_empty());
}

#[test]
fn excluded_cgo_source_is_ignored() {
    let fx = Fixture::new();
    let foo = fx.source("src/foo.go", "package foo\n");
    let cgo = fx.source("src/cgo_darwin.go", "package foo\n\nimport \"C\"\n");
    let request = fx.request(vec![foo, cgo], &[]);

    fx.toolchain.compile(&request).unwrap();
    assert_eq!(fx.toolchain.executor().invocations().len(), 2);
}

#[test]
fn unresolved_import_names_file_and_import() {
    let fx = Fixture::new();
    let foo = fx.source("src/foo.go", "package foo\n\nimport \"example.com/missing\"\n");
    let request = fx.request(vec![foo.clone()], &[]);

    let err = fx.toolchain.compile(&request).unwrap_err();

    let Error::UnresolvedImport { path, import } = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(*path, foo);
    assert_eq!(import, "example.com/missing");
    assert!(err.to_string().ends_with(
        r#"src/foo.go: import "example.com/missing" is not provided by any direct dependency"#
    ));
    assert!(fx.toolchain.executor().invocations().is_empty());
}

#[test]
fn object_dependencies_are_raw_inputs_only() {
    let fx = Fixture::new();
    let foo = fx.source("src/foo.go", "package foo\n\nimport \"fmt\"\n");
    let asm_obj = fx.root().join("src/asm.o");
    let request = fx.request(
        vec![foo, asm_obj],
        &["example.com/baz=gen/baz.o", "extra/blob.o"],
    );

    fx.toolchain.compile(&request).unwrap();

    insta::assert_snapshot!(fx.rendered(), @r"
    gccgo -c -g -gno-record-gcc-switches -fgo-importcfg=<scratch> -o out/foo.o -fgo-pkgpath=example.com/foo src/foo.go src/asm.o gen/baz.o extra/blob.o
    ar rcD out/foo%/example.com/libfoo.a out/foo.o
    ");
    assert_eq!(fx.importcfgs()[0], "packagefile fmt=/goroot/pkg/fmt.a\n");
}

#[test]
fn direct_dependency_overrides_std() {
    let fx = Fixture::new();
    let foo = fx.source("src/foo.go", "package foo\n\nimport \"fmt\"\n");
    let request = fx.request(vec![foo], &["fmt=vendor%/libfmt.a"]);

    fx.toolchain.compile(&request).unwrap();

    assert_eq!(fx.importcfgs()[0], "packagefile fmt=vendor%/libfmt.a\n");
    assert!(fx.rendered().contains("-I vendor%"));
}

#[test]
fn substituted_runtime_resolves_under_standard_name() {
    let fx = Fixture::new();
    let foo = fx.source("src/foo.go", "package foo\n\nimport \"runtime\"\n");
    let request = fx.request(
        vec![foo],
        &["github.com/iansmith/parigot/src/go/runtime=rt%/github.com/iansmith/parigot/src/go/libruntime.a"],
    );

    fx.toolchain.compile(&request).unwrap();

    assert_eq!(
        fx.importcfgs()[0],
        "packagefile runtime=rt%/github.com/iansmith/parigot/src/go/libruntime.a\n"
    );
    assert!(fx.rendered().contains("-I rt%"));
}

#[test]
fn substituted_package_path_is_compiled_under_standard_name() {
    let fx = Fixture::new();
    let rt = fx.source("src/runtime.go", "package runtime\n");
    let mut request = fx.request(vec![rt], &[]);
    request.package_path = Some("github.com/iansmith/parigot/src/go/runtime".to_owned());

    fx.toolchain.compile(&request).unwrap();

    assert!(fx.rendered().contains(" -fgo-pkgpath=runtime "));
}

#[test]
fn main_package_has_no_pkgpath() {
    let fx = Fixture::new();
    let main = fx.source("cmd/main.go", "package main\n");
    let mut request = fx.request(vec![main], &[]);
    request.package_path = None;

    fx.toolchain.compile(&request).unwrap();

    assert!(!fx.rendered().contains("-fgo-pkgpath"));
}

#[test]
fn extra_objects_follow_primary_object() {
    let fx = Fixture::new();
    let foo = fx.source("src/foo.go", "package foo\n");
    let mut request = fx.request(vec![foo], &[]);
    request.extra_objects = vec![fx.root().join("asm/a.o"), fx.root().join("asm/b.o")];

    fx.toolchain.compile(&request).unwrap();

    let rendered = fx.rendered();
    let archive_line = rendered.lines().nth(1).unwrap();
    assert_eq!(
        archive_line,
        "ar rcD out/foo%/example.com/libfoo.a out/foo.o asm/a.o asm/b.o"
    );
}

#[test]
fn stale_archive_is_removed() {
    let fx = Fixture::new();
    let foo = fx.source("src/foo.go", "package foo\n");
    let request = fx.request(vec![foo], &[]);
    let stale = write_file(fx.root(), "out/foo%/example.com/libfoo.a", "old");

    fx.toolchain.compile(&request).unwrap();

    assert!(!stale.exists());
}

#[test]
fn compiler_failure_skips_archiving() {
    let fx = Fixture::with_executor(RecordingExecutor::failing_at(0));
    let foo = fx.source("src/foo.go", "package foo\n");
    let request = fx.request(vec![foo], &[]);

    assert!(fx.toolchain.compile(&request).is_err());
    assert_eq!(fx.toolchain.executor().invocations().len(), 1);
}

#[test]
fn no_matching_go_sources() {
    let fx = Fixture::new();
    let windows = fx.source("src/foo_windows.go", "package foo\n");
    let request = fx.request(vec![windows], &[]);

    let err = fx.toolchain.compile(&request).unwrap_err();
    assert_eq!(err.to_string(), "no Go source files match the build context");
}

#[test]
fn unsupported_source_extension() {
    let fx = Fixture::new();
    let c = fx.source("src/foo.c", "int x;\n");
    let request = fx.request(vec![c], &[]);

    let err = fx.toolchain.compile(&request).unwrap_err();
    assert!(matches!(err, Error::Argument(_)));
    assert!(err.to_string().ends_with("src/foo.c: unsupported source file, expected .go or .o"));
}
