//! Catalog module
//!
//! This module contains the table catalog, schema descriptors, data types and
//! the schema file loader.

pub mod catalog;
pub mod loader;
pub mod schema;
pub mod types;

pub use catalog::{Catalog, TableId};
pub use loader::{parse_table_line, LoaderConfig, SchemaLoader, TableDefinition};
pub use schema::{Field, SchemaDescriptor};
pub use types::Type;
