//! The importcfg format: a line-oriented index from import path to archive.
//!
//! ```text
//! # comment
//! packagefile fmt=/usr/lib/go/pkg/linux_arm64/fmt.a
//! packagefile example.com/foo=bazel-out/foo%/example.com/libfoo.a
//! ```
//!
//! Parsing is lenient: blank lines, `#` comments and unknown verbs are
//! skipped so newer files still load. Output is always sorted by import path
//! so equal mappings serialize to identical bytes.

mod manager;
mod substitution;


use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

pub use manager::ImportcfgManager;
pub use substitution::{BUILTIN_SUBSTITUTIONS, Substitution, SubstitutionTable};

use crate::{Error, Result};

const PACKAGEFILE: &str = "packagefile";

/// Mapping from import path to archive file.
///
/// Equality ignores insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Importcfg {
    entries: IndexMap<String, PathBuf>,
}

impl Importcfg {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Self {
        let mut cfg = Self::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (verb, args) = match line.split_once(' ') {
                Some((verb, args)) => (verb, args.trim()),
                None => (line, ""),
            };
            if verb != PACKAGEFILE {
                continue;
            }
            if let Some((import_path, file)) = args.split_once('=')
                && !import_path.is_empty()
            {
                cfg.insert(import_path, file);
            }
        }
        cfg
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::parse(&text))
    }

    /// Inserts or replaces an entry, returning the previous archive.
    pub fn insert(
        &mut self,
        import_path: impl Into<String>,
        archive: impl Into<PathBuf>,
    ) -> Option<PathBuf> {
        self.entries.insert(import_path.into(), archive.into())
    }

    pub fn remove(&mut self, import_path: &str) -> Option<PathBuf> {
        self.entries.shift_remove(import_path)
    }

    pub fn get(&self, import_path: &str) -> Option<&Path> {
        self.entries.get(import_path).map(PathBuf::as_path)
    }

    pub fn contains(&self, import_path: &str) -> bool {
        self.entries.contains_key(import_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_path()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries sorted ascending by import path.
    pub fn sorted(&self) -> Vec<(&str, &Path)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Renders the entries as-is, sorted. No substitution is applied.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (import_path, archive) in self.sorted() {
            let _ = writeln!(out, "{PACKAGEFILE} {import_path}={}", archive.display());
        }
        out
    }
}

impl<K: Into<String>, V: Into<PathBuf>> FromIterator<(K, V)> for Importcfg {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut cfg = Self::new();
        for (k, v) in iter {
            cfg.insert(k, v);
        }
        cfg
    }
}
