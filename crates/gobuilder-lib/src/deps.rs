//! Dependency descriptors, classification, and closures.
//!
//! The rule layer passes dependencies as `importpath=file` descriptors. A
//! descriptor is one of:
//!
//! - a pure object (no import path): a raw input for the tool, nothing more
//! - an intermediate object (`.o` file): also a raw input; its contents were
//!   merged into some other archive, so it gets no importcfg entry
//! - a library: one importcfg entry and one `-L`/`-l` pair

use std::path::{Path, PathBuf};
use std::str::FromStr;

use indexmap::IndexMap;

use crate::importcfg::Importcfg;
use crate::{Error, Result};

pub const OBJECT_SUFFIX: &str = ".o";

/// A compiled package archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Archive {
    pub import_path: String,
    pub path: PathBuf,
}

impl Archive {
    pub fn new(import_path: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            import_path: import_path.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    Object,
    Intermediate,
    Library,
}

/// A parsed `importpath=file` descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub import_path: Option<String>,
    pub path: PathBuf,
}

impl Dependency {
    pub fn library(import_path: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            import_path: Some(import_path.into()),
            path: path.into(),
        }
    }

    pub fn object(path: impl Into<PathBuf>) -> Self {
        Self {
            import_path: None,
            path: path.into(),
        }
    }

    pub fn kind(&self) -> DependencyKind {
        if self.import_path.is_none() {
            DependencyKind::Object
        } else if is_object_file(&self.path) {
            DependencyKind::Intermediate
        } else {
            DependencyKind::Library
        }
    }
}

impl FromStr for Dependency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (import_path, file) = match s.split_once('=') {
            Some((import_path, file)) => (Some(import_path), file),
            None => (None, s),
        };
        if file.is_empty() {
            return Err(Error::Argument(format!(
                "invalid dependency {s:?}: expected importpath=file"
            )));
        }
        Ok(Self {
            import_path: import_path.filter(|p| !p.is_empty()).map(str::to_owned),
            path: PathBuf::from(file),
        })
    }
}

pub fn is_object_file(path: &Path) -> bool {
    path.to_str().is_some_and(|p| p.ends_with(OBJECT_SUFFIX))
}

/// A set of archives keyed by import path.
///
/// Insertion order is irrelevant; use [`DependencySet::sorted`] wherever the
/// order becomes visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    archives: IndexMap<String, PathBuf>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an archive. The same import path may only map to one file.
    pub fn insert(&mut self, archive: Archive) -> Result<()> {
        match self.archives.get(&archive.import_path) {
            Some(existing) if *existing != archive.path => Err(Error::Argument(format!(
                "import path {:?} is provided by both {} and {}",
                archive.import_path,
                existing.display(),
                archive.path.display()
            ))),
            Some(_) => Ok(()),
            None => {
                self.archives.insert(archive.import_path, archive.path);
                Ok(())
            }
        }
    }

    pub fn union(&mut self, other: &DependencySet) -> Result<()> {
        for archive in other.iter() {
            self.insert(archive)?;
        }
        Ok(())
    }

    pub fn get(&self, import_path: &str) -> Option<&Path> {
        self.archives.get(import_path).map(PathBuf::as_path)
    }

    pub fn contains(&self, import_path: &str) -> bool {
        self.archives.contains_key(import_path)
    }

    pub fn len(&self) -> usize {
        self.archives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Archive> + '_ {
        self.archives
            .iter()
            .map(|(import_path, path)| Archive::new(import_path, path))
    }

    /// Archives in ascending import-path order.
    pub fn sorted(&self) -> Vec<Archive> {
        let mut archives: Vec<_> = self.iter().collect();
        archives.sort_unstable_by(|a, b| a.import_path.cmp(&b.import_path));
        archives
    }

    pub fn to_importcfg(&self) -> Importcfg {
        self.archives
            .iter()
            .map(|(import_path, path)| (import_path.as_str(), path.as_path()))
            .collect()
    }
}

/// A library together with the closure of everything it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryInfo {
    pub archive: Archive,
    pub deps: DependencySet,
}

impl LibraryInfo {
    pub fn new(archive: Archive) -> Self {
        Self {
            archive,
            deps: DependencySet::new(),
        }
    }

    pub fn with_deps(archive: Archive, deps: DependencySet) -> Self {
        Self { archive, deps }
    }
}

/// Union of every library and its recorded closure.
pub fn closure<'a>(libraries: impl IntoIterator<Item = &'a LibraryInfo>) -> Result<DependencySet> {
    let mut set = DependencySet::new();
    for library in libraries {
        set.insert(library.archive.clone())?;
        set.union(&library.deps)?;
    }
    Ok(set)
}

/// Descriptors split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Files handed to the tool as-is, in descriptor order.
    pub raw_inputs: Vec<PathBuf>,
    pub libraries: DependencySet,
}

pub fn resolve<'a>(deps: impl IntoIterator<Item = &'a Dependency>) -> Result<Resolution> {
    let mut resolution = Resolution::default();
    for dep in deps {
        match (dep.kind(), &dep.import_path) {
            (DependencyKind::Library, Some(import_path)) => resolution
                .libraries
                .insert(Archive::new(import_path, &dep.path))?,
            _ => {
                if !resolution.raw_inputs.contains(&dep.path) {
                    resolution.raw_inputs.push(dep.path.clone());
                }
            }
        }
    }
    Ok(resolution)
}
