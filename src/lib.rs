//! SchemaDB - schema and catalog layer of a relational database engine
//!
//! This library provides:
//! - Schema descriptors (typed, optionally named fields with a fixed row size)
//! - The table catalog (registration and lookup by name or id)
//! - Loading of schema definition files into a catalog
//! - The storage file handle contract tables are registered with

pub mod catalog;
pub mod error;
pub mod storage;

pub use catalog::{Catalog, SchemaDescriptor, TableId, Type};
pub use error::{Error, ErrorKind, Result};
