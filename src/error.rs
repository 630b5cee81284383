//! Error types for SchemaDB
//!
//! This module defines all error types used by the schema and catalog layer.

use crate::catalog::TableId;
use thiserror::Error;

/// The main error type for SchemaDB
#[derive(Error, Debug)]
pub enum Error {
    // ========== Lookup Errors ==========
    #[error("Catalog error: table '{0}' not found")]
    TableNotFound(String),

    #[error("Catalog error: no table with id {0}")]
    TableIdNotFound(TableId),

    #[error("Schema error: no field named '{0}'")]
    FieldNotFound(String),

    // ========== Index Errors ==========
    #[error("Schema error: field index {index} out of range for {num_fields} fields")]
    FieldIndexOutOfRange { index: usize, num_fields: usize },

    // ========== Construction Errors ==========
    #[error("Schema error: {types} types but {names} names")]
    FieldCountMismatch { types: usize, names: usize },

    #[error("Schema error: a schema needs at least one field")]
    EmptySchema,

    // ========== Parse Errors ==========
    #[error("Parse error: line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("Parse error: line {line}: unknown type '{keyword}'")]
    UnknownType { line: usize, keyword: String },

    #[error("Parse error: line {line}: unknown annotation '{annotation}'")]
    UnknownAnnotation { line: usize, annotation: String },

    // ========== I/O Errors ==========
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Broad error category, for callers that branch on the kind of failure
/// rather than the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Index,
    Construction,
    Parse,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TableNotFound(_) | Error::TableIdNotFound(_) | Error::FieldNotFound(_) => {
                ErrorKind::NotFound
            }
            Error::FieldIndexOutOfRange { .. } => ErrorKind::Index,
            Error::FieldCountMismatch { .. } | Error::EmptySchema => ErrorKind::Construction,
            Error::MalformedLine { .. }
            | Error::UnknownType { .. }
            | Error::UnknownAnnotation { .. } => ErrorKind::Parse,
            Error::IoError(_) => ErrorKind::Io,
        }
    }

    /// True for recoverable lookup misses
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Result type alias for SchemaDB operations
pub type Result<T> = std::result::Result<T, Error>;
