//! Data types for SchemaDB
//!
//! This module defines the fixed-width primitive types a field can hold.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum payload length of a string field, in bytes
pub const STRING_LEN: usize = 128;

/// Width of an integer field, in bytes
pub const INT_LEN: usize = 4;

/// Primitive field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    /// 32-bit signed integer
    Int,
    /// Fixed-size string: 4-byte length prefix followed by `STRING_LEN` bytes
    String,
}

impl Type {
    /// Get the size in bytes of a value of this type
    pub fn size(&self) -> usize {
        match self {
            Type::Int => INT_LEN,
            Type::String => STRING_LEN + 4,
        }
    }

    /// Keyword used for this type in schema definition files
    pub fn keyword(&self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::String => "string",
        }
    }
}

/// Error returned when a type keyword is not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTypeKeyword(pub String);

impl FromStr for Type {
    type Err = UnknownTypeKeyword;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("int") {
            Ok(Type::Int)
        } else if s.eq_ignore_ascii_case("string") {
            Ok(Type::String)
        } else {
            Err(UnknownTypeKeyword(s.to_string()))
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_size() {
        assert_eq!(Type::Int.size(), 4);
        assert_eq!(Type::String.size(), 132);
    }

    #[test]
    fn test_parse_keyword() {
        assert_eq!("int".parse::<Type>(), Ok(Type::Int));
        assert_eq!("INT".parse::<Type>(), Ok(Type::Int));
        assert_eq!("String".parse::<Type>(), Ok(Type::String));
        assert_eq!(
            "bogus".parse::<Type>(),
            Err(UnknownTypeKeyword("bogus".to_string()))
        );
        // Only the two keywords are recognized, not SQL spellings
        assert!("integer".parse::<Type>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Type::Int.to_string(), "int");
        assert_eq!(Type::String.to_string(), "string");
    }
}
