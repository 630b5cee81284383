//! Heap file handles for SchemaDB
//!
//! The catalog only needs two things from a table's storage file: a stable
//! identifier and the schema of the rows it holds. `DbFile` captures that
//! contract; `HeapFile` is the handle the schema loader creates for each table.

use crate::catalog::{SchemaDescriptor, TableId};
use crate::error::Result;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A table's on-disk storage, as seen by the catalog
pub trait DbFile: Send + Sync + fmt::Debug {
    /// Identifier of this file, used as the table id
    fn id(&self) -> TableId;

    /// Row layout of the tuples stored in this file
    fn schema(&self) -> Arc<SchemaDescriptor>;
}

/// Handle to a heap file holding one table's rows
#[derive(Debug, Clone)]
pub struct HeapFile {
    /// Absolute path of the backing file
    path: PathBuf,
    /// Row layout
    schema: Arc<SchemaDescriptor>,
    /// Derived from `path`
    id: TableId,
}

impl HeapFile {
    /// Create a handle for the file at `path`. The file itself is not touched.
    ///
    /// The id is a hash of the absolute path, so it is stable within a build
    /// but may change when the crate is built with a different Rust release.
    pub fn new(path: impl AsRef<Path>, schema: SchemaDescriptor) -> Result<Self> {
        let path = std::path::absolute(path.as_ref())?;
        let id = Self::id_for_path(&path);
        Ok(Self {
            path,
            schema: Arc::new(schema),
            id,
        })
    }

    /// Table id a file at the given absolute path gets (stable within a build)
    pub fn id_for_path(path: &Path) -> TableId {
        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        TableId(hasher.finish())
    }

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DbFile for HeapFile {
    fn id(&self) -> TableId {
        self.id
    }

    fn schema(&self) -> Arc<SchemaDescriptor> {
        Arc::clone(&self.schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Type;

    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::anonymous(vec![Type::Int]).unwrap()
    }

    #[test]
    fn test_id_is_stable_per_path() {
        let dir = tempfile::tempdir().unwrap();
        let a = HeapFile::new(dir.path().join("a.dat"), schema()).unwrap();
        let a_again = HeapFile::new(dir.path().join("a.dat"), schema()).unwrap();
        let b = HeapFile::new(dir.path().join("b.dat"), schema()).unwrap();

        assert_eq!(a.id(), a_again.id());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_file_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.dat");
        let file = HeapFile::new(&path, schema()).unwrap();

        assert_eq!(file.path(), path.as_path());
        assert!(!path.exists());
        assert_eq!(*file.schema(), schema());
    }

    #[test]
    fn test_relative_path_is_made_absolute() {
        let file = HeapFile::new("relative.dat", schema()).unwrap();
        assert!(file.path().is_absolute());
    }
}
