//! Archive naming scheme.
//!
//! A package with import path `example.com/foo` built by target `mytarget`
//! lives at `mytarget%/example.com/libfoo.a`:
//!
//! - `mytarget%` is the target's namespace, so two targets that build the same
//!   import path never collide. It is also the compiler's `-I` root.
//! - The import path's directories are mirrored below the namespace.
//! - The file name is `lib<base>.a`, which is what `-L <dir> -l<base>` finds.
//!
//! [`archive_path`] and [`link_name`] are inverses and must change together.

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

pub const LIB_PREFIX: &str = "lib";
pub const ARCHIVE_SUFFIX: &str = ".a";
pub const NAMESPACE_SUFFIX: &str = "%";

/// The namespace directory holding every archive built by `target`.
pub fn namespace_dir(target: &str) -> PathBuf {
    PathBuf::from(format!("{target}{NAMESPACE_SUFFIX}"))
}

/// Where `target` writes the archive for `import_path`.
pub fn archive_path(target: &str, import_path: &str) -> Result<PathBuf> {
    if target.is_empty() {
        return Err(Error::Argument("empty build target name".to_owned()));
    }
    let segments = import_segments(import_path)?;
    let Some((base, dirs)) = segments.split_last() else {
        unreachable!("import_segments never returns an empty list")
    };

    let mut path = namespace_dir(target);
    path.extend(dirs);
    path.push(format!("{LIB_PREFIX}{base}{ARCHIVE_SUFFIX}"));
    Ok(path)
}

/// The directory to pass as a linker search path for `archive`.
pub fn search_dir(archive: &Path) -> &Path {
    match archive.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// The `-l` name for `archive`: its file name without `lib` and `.a`.
pub fn link_name(archive: &Path) -> Option<&str> {
    archive
        .file_name()?
        .to_str()?
        .strip_prefix(LIB_PREFIX)?
        .strip_suffix(ARCHIVE_SUFFIX)
        .filter(|name| !name.is_empty())
}

/// The compiler include root for `archive` holding `import_path`.
///
/// Returns `None` unless `archive` ends in `<dirs of import_path>/lib<base>.a`.
pub fn include_root(archive: &Path, import_path: &str) -> Option<PathBuf> {
    let segments = import_segments(import_path).ok()?;
    let (base, dirs) = segments.split_last()?;
    if link_name(archive)? != *base {
        return None;
    }

    let mut root = search_dir(archive).to_path_buf();
    for dir in dirs.iter().rev() {
        if root.file_name()?.to_str()? != *dir {
            return None;
        }
        root.pop();
    }
    if root.as_os_str().is_empty() {
        root.push(".");
    }
    Some(root)
}

fn import_segments(import_path: &str) -> Result<Vec<&str>> {
    let invalid = |why: &str| Error::Argument(format!("invalid import path {import_path:?}: {why}"));

    if import_path.is_empty() {
        return Err(invalid("empty"));
    }
    let segments: Vec<&str> = import_path.split('/').collect();
    for segment in &segments {
        match Path::new(segment).components().next() {
            _ if segment.is_empty() => return Err(invalid("empty path segment")),
            Some(Component::Normal(_)) if !segment.contains('\\') => {}
            _ => return Err(invalid("path segments must be plain names")),
        }
    }
    Ok(segments)
}
