//! Schema definitions for SchemaDB
//!
//! A `SchemaDescriptor` describes the layout of a row: an ordered list of
//! typed, optionally named fields with a fixed total byte size.

use super::types::Type;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single field of a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field type
    #[serde(rename = "type")]
    field_type: Type,
    /// Field name, absent for anonymous fields
    name: Option<String>,
}

impl Field {
    /// Create a field, `name` is `None` for an anonymous field
    pub fn new(field_type: Type, name: Option<String>) -> Self {
        Self { field_type, name }
    }

    /// Get the field type
    pub fn field_type(&self) -> Type {
        self.field_type
    }

    /// Get the field name, `None` if anonymous
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Row layout of a table. Immutable once built.
///
/// Equality only looks at types: two descriptors with the same type sequence
/// compare equal even when their field names differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SchemaFields")]
pub struct SchemaDescriptor {
    fields: Vec<Field>,
}

/// Serialized form, checked by `from_fields` before it becomes a descriptor
#[derive(Deserialize)]
struct SchemaFields {
    fields: Vec<Field>,
}

impl TryFrom<SchemaFields> for SchemaDescriptor {
    type Error = Error;

    fn try_from(raw: SchemaFields) -> Result<Self> {
        Self::from_fields(raw.fields)
    }
}

impl SchemaDescriptor {
    /// Create a descriptor from parallel lists of types and names.
    ///
    /// Fails if the lists differ in length or are empty.
    pub fn new<N: Into<String>>(types: Vec<Type>, names: Vec<Option<N>>) -> Result<Self> {
        if types.len() != names.len() {
            return Err(Error::FieldCountMismatch {
                types: types.len(),
                names: names.len(),
            });
        }
        let fields = types
            .into_iter()
            .zip(names)
            .map(|(t, n)| Field::new(t, n.map(Into::into)))
            .collect();
        Self::from_fields(fields)
    }

    /// Create a descriptor whose fields are all unnamed
    pub fn anonymous(types: Vec<Type>) -> Result<Self> {
        Self::from_fields(types.into_iter().map(|t| Field::new(t, None)).collect())
    }

    /// Create a descriptor from already built fields
    pub fn from_fields(fields: Vec<Field>) -> Result<Self> {
        if fields.is_empty() {
            return Err(Error::EmptySchema);
        }
        Ok(Self { fields })
    }

    /// Merge two descriptors: all fields of `a` followed by all fields of `b`
    pub fn concat(a: &SchemaDescriptor, b: &SchemaDescriptor) -> SchemaDescriptor {
        let mut fields = Vec::with_capacity(a.num_fields() + b.num_fields());
        fields.extend_from_slice(&a.fields);
        fields.extend_from_slice(&b.fields);
        SchemaDescriptor { fields }
    }

    /// Get number of fields
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Name of the field at `index`, `None` if the field is anonymous
    pub fn field_name(&self, index: usize) -> Result<Option<&str>> {
        self.field(index).map(Field::name)
    }

    /// Type of the field at `index`
    pub fn field_type(&self, index: usize) -> Result<Type> {
        self.field(index).map(Field::field_type)
    }

    /// Get field by index
    pub fn field(&self, index: usize) -> Result<&Field> {
        self.fields.get(index).ok_or(Error::FieldIndexOutOfRange {
            index,
            num_fields: self.fields.len(),
        })
    }

    /// Index of the first field named `name`. Anonymous fields never match.
    pub fn index_of_name(&self, name: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|f| f.name() == Some(name))
            .ok_or_else(|| Error::FieldNotFound(name.to_string()))
    }

    /// Size in bytes of a row with this layout
    pub fn byte_size(&self) -> usize {
        self.fields.iter().map(|f| f.field_type.size()).sum()
    }

    /// Get all fields
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Iterate over the fields in order
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }
}

impl PartialEq for SchemaDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.byte_size() == other.byte_size()
            && self.num_fields() == other.num_fields()
            && self
                .fields
                .iter()
                .zip(&other.fields)
                .all(|(a, b)| a.field_type == b.field_type)
    }
}

impl Eq for SchemaDescriptor {}

// Names are left out so that hashing agrees with equality.
impl Hash for SchemaDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fields.len().hash(state);
        for field in &self.fields {
            field.field_type.hash(state);
        }
    }
}

impl<'a> IntoIterator for &'a SchemaDescriptor {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl fmt::Display for SchemaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}({})", field.field_type, field.name().unwrap_or(""))?;
        }
        Ok(())
    }
}
