use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::LoadError;
use super::loader::load_file;
use super::model::SalesTable;

/// Owns the canonical sales table for the life of the process.
///
/// The source is read once, in [`SalesCache::load`]. There is no
/// invalidation; reading another file means building another cache.
#[derive(Debug, Clone)]
pub struct SalesCache {
    source: PathBuf,
    table: Arc<SalesTable>,
}

impl SalesCache {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let table = load_file(path)?;
        Ok(Self::from_table(path, table))
    }

    /// Wrap an already built table.
    pub fn from_table(source: impl Into<PathBuf>, table: SalesTable) -> Self {
        SalesCache {
            source: source.into(),
            table: Arc::new(table),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn table(&self) -> &SalesTable {
        &self.table
    }

    /// A read-only handle for callers that keep their own filter state.
    pub fn shared(&self) -> Arc<SalesTable> {
        Arc::clone(&self.table)
    }
}
