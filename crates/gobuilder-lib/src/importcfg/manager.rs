use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tempfile::NamedTempFile;

use super::{Importcfg, SubstitutionTable};
use crate::{Error, Result};

/// Reads, merges and writes importcfg files under one substitution table.
#[derive(Debug, Clone)]
pub struct ImportcfgManager {
    table: Arc<SubstitutionTable>,
}

impl Default for ImportcfgManager {
    fn default() -> Self {
        Self::new(Arc::new(SubstitutionTable::builtin()))
    }
}

impl ImportcfgManager {
    pub fn new(table: Arc<SubstitutionTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &SubstitutionTable {
        &self.table
    }

    /// Drops replaced paths, then renames the rest through the table.
    pub fn normalize(&self, mapping: &Importcfg) -> Importcfg {
        mapping
            .iter()
            .filter(|(import_path, _)| !self.table.is_replaced(import_path))
            .map(|(import_path, archive)| (self.table.resolve(import_path), archive))
            .collect()
    }

    /// Normalized, sorted importcfg text.
    pub fn serialize(&self, mapping: &Importcfg) -> String {
        self.normalize(mapping).render()
    }

    pub fn write(&self, mapping: &Importcfg, path: &Path) -> Result<()> {
        fs::write(path, self.serialize(mapping)).map_err(|e| Error::io(path, e))
    }

    /// Overlays direct dependencies on the standard library.
    ///
    /// Replaced paths are removed from `std` first; both sides are then
    /// renamed through the table, and direct entries win on collision. The
    /// result is already normalized: write it with [`Self::write_scratch`],
    /// not [`Self::write`].
    pub fn merge(&self, std: &Importcfg, direct: &Importcfg) -> Importcfg {
        let mut merged = self.normalize(std);
        for (import_path, archive) in direct.iter() {
            merged.insert(self.table.resolve(import_path), archive);
        }
        merged
    }

    /// Writes an already-merged mapping to a private temporary file.
    ///
    /// The file is deleted when the returned handle is dropped.
    pub fn write_scratch(&self, mapping: &Importcfg) -> Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("importcfg-")
            .tempfile()
            .map_err(|e| Error::io(std::env::temp_dir(), e))?;
        let written = file
            .write_all(mapping.render().as_bytes())
            .and_then(|()| file.flush());
        written.map_err(|e| Error::io(file.path(), e))?;
        Ok(file)
    }
}
