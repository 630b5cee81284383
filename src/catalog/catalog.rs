//! System Catalog for SchemaDB
//!
//! This module keeps track of the registered tables: their storage file,
//! name and primary key. Lookups are linear scans over the registration
//! order, which is fine for the handful of tables an engine bootstraps with.

use super::loader::SchemaLoader;
use super::schema::SchemaDescriptor;
use crate::error::{Error, Result};
use crate::storage::DbFile;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Identifier of a table, taken from its storage file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableId(pub u64);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One registered table
#[derive(Debug, Clone)]
struct CatalogEntry {
    file: Arc<dyn DbFile>,
    name: String,
    /// Empty if the table has no primary key
    primary_key: String,
}

impl CatalogEntry {
    fn id(&self) -> TableId {
        self.file.id()
    }
}

/// System Catalog - registry of all tables
#[derive(Debug, Default)]
pub struct Catalog {
    /// Entries in registration order
    entries: RwLock<Vec<CatalogEntry>>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    // Entries are only ever appended or dropped as a whole, so a panic while
    // holding the lock cannot leave them half-updated.
    fn read(&self) -> RwLockReadGuard<'_, Vec<CatalogEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<CatalogEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a table without a primary key
    pub fn add_table(&self, file: Arc<dyn DbFile>, name: impl Into<String>) {
        self.add_table_with_key(file, name, "");
    }

    /// Register a table stored in `file`.
    ///
    /// Duplicate names and ids are accepted. A later registration shadows
    /// earlier ones for `table_id`, while id lookups keep finding the first.
    pub fn add_table_with_key(
        &self,
        file: Arc<dyn DbFile>,
        name: impl Into<String>,
        primary_key: impl Into<String>,
    ) {
        let entry = CatalogEntry {
            file,
            name: name.into(),
            primary_key: primary_key.into(),
        };
        debug!(table = %entry.name, id = %entry.id(), "registering table");
        self.write().push(entry);
    }

    /// Id of the most recently registered table called `name`
    pub fn table_id(&self, name: &str) -> Result<TableId> {
        self.read()
            .iter()
            .rev()
            .find(|e| e.name == name)
            .map(CatalogEntry::id)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    fn find<T>(&self, id: TableId, f: impl FnOnce(&CatalogEntry) -> T) -> Option<T> {
        self.read().iter().find(|e| e.id() == id).map(f)
    }

    /// Row layout of the table with the given id
    pub fn schema_of(&self, id: TableId) -> Result<Arc<SchemaDescriptor>> {
        self.find(id, |e| e.file.schema())
            .ok_or(Error::TableIdNotFound(id))
    }

    /// Storage file of the table with the given id
    pub fn file_handle_of(&self, id: TableId) -> Result<Arc<dyn DbFile>> {
        self.find(id, |e| Arc::clone(&e.file))
            .ok_or(Error::TableIdNotFound(id))
    }

    /// Primary key field of a table.
    ///
    /// Returns `None` if there is no such table and `Some("")` if the table
    /// exists but has no primary key.
    pub fn primary_key_of(&self, id: TableId) -> Option<String> {
        self.find(id, |e| e.primary_key.clone())
    }

    /// Name of a table, `None` if there is no such table
    pub fn table_name(&self, id: TableId) -> Option<String> {
        self.find(id, |e| e.name.clone())
    }

    /// Ids of all registered tables, in registration order.
    ///
    /// The ids are copied when this is called; registering or clearing
    /// afterwards does not change what the iterator yields.
    pub fn list_table_ids(&self) -> std::vec::IntoIter<TableId> {
        let ids: Vec<TableId> = self.read().iter().map(CatalogEntry::id).collect();
        ids.into_iter()
    }

    /// Number of registered tables
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Delete all tables from the catalog
    pub fn clear(&self) {
        let mut entries = self.write();
        debug!(tables = entries.len(), "clearing catalog");
        entries.clear();
    }

    /// Register every table defined in the schema file at `path`.
    ///
    /// Tables go into files named after them, next to the schema file.
    /// Stops at the first bad line; tables from earlier lines stay registered.
    pub fn load_schema(&self, path: impl AsRef<Path>) -> Result<usize> {
        SchemaLoader::default().load_file(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Type;

    /// File handle with a caller-chosen id
    #[derive(Debug)]
    struct MockFile {
        id: u64,
        schema: Arc<SchemaDescriptor>,
    }

    impl MockFile {
        fn new(id: u64, types: Vec<Type>) -> Arc<dyn DbFile> {
            Arc::new(Self {
                id,
                schema: Arc::new(SchemaDescriptor::anonymous(types).unwrap()),
            })
        }
    }

    impl DbFile for MockFile {
        fn id(&self) -> TableId {
            TableId(self.id)
        }

        fn schema(&self) -> Arc<SchemaDescriptor> {
            Arc::clone(&self.schema)
        }
    }

    #[test]
    fn test_add_and_lookup_table() {
        let catalog = Catalog::new();
        catalog.add_table_with_key(MockFile::new(1, vec![Type::Int, Type::String]), "users", "id");

        let id = catalog.table_id("users").unwrap();
        assert_eq!(id, TableId(1));
        assert_eq!(catalog.schema_of(id).unwrap().num_fields(), 2);
        assert_eq!(catalog.file_handle_of(id).unwrap().id(), id);
        assert_eq!(catalog.table_name(id).as_deref(), Some("users"));
        assert_eq!(catalog.primary_key_of(id).as_deref(), Some("id"));
    }

    #[test]
    fn test_missing_table() {
        let catalog = Catalog::new();
        catalog.add_table(MockFile::new(1, vec![Type::Int]), "a");

        assert!(matches!(
            catalog.table_id("b"),
            Err(Error::TableNotFound(_))
        ));
        assert!(matches!(
            catalog.schema_of(TableId(2)),
            Err(Error::TableIdNotFound(TableId(2)))
        ));
        assert!(catalog.file_handle_of(TableId(2)).is_err());
        assert_eq!(catalog.table_name(TableId(2)), None);
    }

    #[test]
    fn test_primary_key_absent_vs_missing_table() {
        let catalog = Catalog::new();
        catalog.add_table(MockFile::new(1, vec![Type::Int]), "nokey");

        assert_eq!(catalog.primary_key_of(TableId(1)), Some(String::new()));
        assert_eq!(catalog.primary_key_of(TableId(9)), None);
    }

    #[test]
    fn test_name_conflict_last_wins() {
        let catalog = Catalog::new();
        catalog.add_table(MockFile::new(1, vec![Type::Int]), "t");
        catalog.add_table(MockFile::new(2, vec![Type::String]), "t");

        assert_eq!(catalog.table_id("t").unwrap(), TableId(2));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_duplicate_id_first_wins() {
        let catalog = Catalog::new();
        catalog.add_table(MockFile::new(5, vec![Type::Int]), "first");
        catalog.add_table(MockFile::new(5, vec![Type::String, Type::String]), "second");

        assert_eq!(catalog.table_name(TableId(5)).as_deref(), Some("first"));
        assert_eq!(catalog.schema_of(TableId(5)).unwrap().num_fields(), 1);
    }

    #[test]
    fn test_empty_name_allowed() {
        let catalog = Catalog::new();
        catalog.add_table(MockFile::new(3, vec![Type::Int]), "");
        assert_eq!(catalog.table_id("").unwrap(), TableId(3));
    }

    #[test]
    fn test_list_table_ids_is_snapshot() {
        let catalog = Catalog::new();
        catalog.add_table(MockFile::new(1, vec![Type::Int]), "a");
        catalog.add_table(MockFile::new(2, vec![Type::Int]), "b");

        let ids = catalog.list_table_ids();
        catalog.add_table(MockFile::new(3, vec![Type::Int]), "c");
        catalog.clear();

        assert_eq!(ids.collect::<Vec<_>>(), vec![TableId(1), TableId(2)]);
    }

    #[test]
    fn test_clear() {
        let catalog = Catalog::new();
        catalog.add_table(MockFile::new(1, vec![Type::Int]), "a");
        let id = catalog.table_id("a").unwrap();

        catalog.clear();

        assert!(catalog.is_empty());
        assert!(catalog.table_id("a").unwrap_err().is_not_found());
        assert!(catalog.file_handle_of(id).unwrap_err().is_not_found());
        assert!(catalog.schema_of(id).unwrap_err().is_not_found());
        assert_eq!(catalog.list_table_ids().count(), 0);
    }

    #[test]
    fn test_shared_across_threads() {
        let catalog = Arc::new(Catalog::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let catalog = Arc::clone(&catalog);
                std::thread::spawn(move || {
                    catalog.add_table(MockFile::new(i, vec![Type::Int]), format!("t{}", i));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(catalog.len(), 4);
        for i in 0..4 {
            assert_eq!(catalog.table_id(&format!("t{}", i)).unwrap(), TableId(i));
        }
    }
}
