//! Schema definition files
//!
//! A schema file describes one table per line:
//!
//! ```text
//! students (id int pk, name string)
//! courses (code string pk, credits int)
//! ```
//!
//! Each field is a name, a type keyword (`int` or `string`, any case) and an
//! optional `pk` marker. Loading a file creates one heap file handle per table
//! and registers it in a [`Catalog`].

use super::catalog::Catalog;
use super::schema::{Field, SchemaDescriptor};
use super::types::Type;
use crate::error::{Error, Result};
use crate::storage::{DbFile, HeapFile};
use nom::bytes::complete::take_until;
use nom::character::complete::char;
use nom::sequence::{delimited, pair};
use nom::IResult;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Default extension of table files
pub const DEFAULT_EXTENSION: &str = "dat";

/// Schema loader configuration
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Directory holding the table files. Defaults to the schema file's directory.
    pub data_dir: Option<PathBuf>,
    /// Extension of table files
    pub extension: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl LoaderConfig {
    /// Create a new loader config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the data directory
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Set the table file extension
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Path of the file backing `table` inside `dir`
    pub fn table_path(&self, dir: &Path, table: &str) -> PathBuf {
        if self.extension.is_empty() {
            dir.join(table)
        } else {
            dir.join(format!("{}.{}", table, self.extension))
        }
    }
}

/// One parsed line of a schema file
#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub schema: SchemaDescriptor,
    /// Empty if no field is marked `pk`
    pub primary_key: String,
}

/// `name (fields)`: everything before the first `(` and between it and the
/// next `)`. Anything after the `)` is ignored.
fn table_header(input: &str) -> IResult<&str, (&str, &str)> {
    pair(
        take_until("("),
        delimited(char('('), take_until(")"), char(')')),
    )(input)
}

fn malformed(line: usize, reason: impl Into<String>) -> Error {
    Error::MalformedLine {
        line,
        reason: reason.into(),
    }
}

/// Parse one field entry into its field and whether it carries `pk`
fn parse_field(entry: &str, line: usize) -> Result<(Field, bool)> {
    let tokens: Vec<&str> = entry.split_whitespace().collect();
    let (name, keyword, annotation) = match tokens.as_slice() {
        [name, keyword] => (*name, *keyword, None),
        [name, keyword, annotation] => (*name, *keyword, Some(*annotation)),
        [] => return Err(malformed(line, "empty field declaration")),
        [name] => return Err(malformed(line, format!("field '{}' has no type", name))),
        _ => {
            return Err(malformed(
                line,
                format!("too many tokens in field declaration '{}'", entry.trim()),
            ))
        }
    };

    let field_type: Type = keyword.parse().map_err(|_| Error::UnknownType {
        line,
        keyword: keyword.to_string(),
    })?;

    let is_pk = match annotation {
        None => false,
        Some("pk") => true,
        Some(other) => {
            return Err(Error::UnknownAnnotation {
                line,
                annotation: other.to_string(),
            })
        }
    };

    Ok((Field::new(field_type, Some(name.to_string())), is_pk))
}

/// Parse one schema file line. `line` is the 1-based line number used in errors.
pub fn parse_table_line(input: &str, line: usize) -> Result<TableDefinition> {
    let (_, (name, field_list)) = table_header(input).map_err(|_| {
        if input.contains('(') {
            malformed(line, "missing ')' after field list")
        } else {
            malformed(line, "missing '(' before field list")
        }
    })?;
    if name.contains(')') {
        return Err(malformed(line, "')' before '('"));
    }
    // The name becomes a file name inside the data directory
    if name.contains(['/', '\\']) {
        return Err(malformed(
            line,
            format!("table name '{}' contains a path separator", name.trim()),
        ));
    }

    let mut fields = Vec::new();
    let mut primary_key = String::new();
    for entry in field_list.split(',') {
        let (field, is_pk) = parse_field(entry, line)?;
        if is_pk {
            primary_key = field.name().unwrap_or_default().to_string();
        }
        fields.push(field);
    }

    Ok(TableDefinition {
        name: name.trim().to_string(),
        schema: SchemaDescriptor::from_fields(fields)?,
        primary_key,
    })
}

/// Loads schema files into a catalog
#[derive(Debug, Clone, Default)]
pub struct SchemaLoader {
    config: LoaderConfig,
}

impl SchemaLoader {
    /// Create a loader with the given config
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Get the loader config
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load the schema file at `path`, returning the number of tables registered
    pub fn load_file(&self, catalog: &Catalog, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let data_dir = match &self.config.data_dir {
            Some(dir) => dir.clone(),
            None => path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        let file = File::open(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "cannot open schema file");
            e
        })?;
        self.load_from(catalog, BufReader::new(file), &data_dir)
    }

    /// Load schema lines from any reader. Table files go in the configured
    /// data directory, or the current directory if none is set.
    pub fn load_reader(&self, catalog: &Catalog, reader: impl BufRead) -> Result<usize> {
        let data_dir = self
            .config
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        self.load_from(catalog, reader, &data_dir)
    }

    fn load_from(&self, catalog: &Catalog, reader: impl BufRead, data_dir: &Path) -> Result<usize> {
        let mut loaded = 0;
        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let def = parse_table_line(&line, line_no).map_err(|e| {
                error!(line = line_no, error = %e, loaded, "aborting schema load");
                e
            })?;

            let file = HeapFile::new(self.config.table_path(data_dir, &def.name), def.schema)?;
            info!(
                table = %def.name,
                id = %file.id(),
                schema = %file.schema(),
                primary_key = %def.primary_key,
                "added table"
            );
            catalog.add_table_with_key(Arc::new(file), def.name, def.primary_key);
            loaded += 1;
        }
        Ok(loaded)
    }
}
