//! In-memory field tree interface consumed by the metadata extractors.
//!
//! The extractors in this crate never touch raw bytes. They read from an
//! already-parsed field tree: a hierarchy of named field sets whose
//! leaves carry a typed value, an optional display string, and a size in
//! bits. A binary parser targeting this crate materializes (or lazily
//! produces) such a tree; the unit tests build trees directly.
//!
//! Lookup supports plain names (`"filename"`), indexed names
//! (`"folder[0]"`), and `/`-separated paths
//! (`"data_desc/file_uncompressed_size"`). Every field set knows its
//! absolute path so lookup failures can name the exact location.

pub mod vector;

pub use vector::{GenericVector, ItemDescriptor, VectorItem};

use crate::common::error::{Error, Result};
use chrono::{DateTime, Utc};

/// Byte order of a parsed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// Human-readable byte-order name, as attached to extracted metadata.
    pub fn name(&self) -> &'static str {
        match self {
            Endian::Little => "Little endian",
            Endian::Big => "Big endian",
        }
    }
}

/// Source format of a parsed document, used for extractor dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    Gzip,
    Bzip2,
    Zip,
    Tar,
    Cab,
    Mar,
}

impl FormatKind {
    /// Declared MIME type of the format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            FormatKind::Gzip => "application/x-gzip",
            FormatKind::Bzip2 => "application/x-bzip2",
            FormatKind::Zip => "application/zip",
            FormatKind::Tar => "application/x-tar",
            FormatKind::Cab => "application/vnd.ms-cab-compressed",
            FormatKind::Mar => "application/x-mar",
        }
    }

    /// Default byte order of the format's on-disk layout.
    pub fn endian(&self) -> Endian {
        match self {
            FormatKind::Gzip | FormatKind::Zip | FormatKind::Cab | FormatKind::Mar => {
                Endian::Little
            },
            FormatKind::Bzip2 | FormatKind::Tar => Endian::Big,
        }
    }
}

/// Typed value of a leaf field.
///
/// `Opaque` marks an undecoded payload region (e.g. the compressed data
/// stream); it carries no value but the owning [`Field`] still reports
/// its size.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    UInt(u64),
    Int(i64),
    Str(String),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Opaque,
}

impl FieldValue {
    /// Truthiness in the loose sense binary headers use it: a zero
    /// integer, empty string, or `false` flag counts as absent.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::UInt(v) => *v != 0,
            FieldValue::Int(v) => *v != 0,
            FieldValue::Str(s) => !s.is_empty(),
            FieldValue::Bool(b) => *b,
            FieldValue::Timestamp(_) => true,
            FieldValue::Opaque => false,
        }
    }
}

/// A leaf field: a named, typed value with an optional display string
/// and a size in bits.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    value: FieldValue,
    display: Option<String>,
    size: u64,
}

impl Field {
    /// Create a leaf field. The size defaults to the encoded size of the
    /// value where one is implied (strings), otherwise zero; use
    /// [`Field::with_size`] when the on-disk size matters.
    pub fn new(name: impl Into<String>, value: FieldValue) -> Self {
        let size = match &value {
            FieldValue::Str(s) => 8 * s.len() as u64,
            _ => 0,
        };
        Self {
            name: name.into(),
            value,
            display: None,
            size,
        }
    }

    /// Create an undecoded payload field of the given size in bits.
    pub fn opaque(name: impl Into<String>, size_bits: u64) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Opaque,
            display: None,
            size: size_bits,
        }
    }

    /// Attach a display string distinct from the raw value.
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// Override the encoded size in bits.
    pub fn with_size(mut self, size_bits: u64) -> Self {
        self.size = size_bits;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Size of the encoded field in bits.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Display string of the field: the parser-provided text if any,
    /// otherwise a plain rendering of the raw value.
    pub fn display(&self) -> String {
        if let Some(display) = &self.display {
            return display.clone();
        }
        match &self.value {
            FieldValue::UInt(v) => v.to_string(),
            FieldValue::Int(v) => v.to_string(),
            FieldValue::Str(s) => s.clone(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Timestamp(dt) => crate::common::text::human_datetime(dt),
            FieldValue::Opaque => String::new(),
        }
    }

    pub fn as_u64(&self) -> Result<u64> {
        match &self.value {
            FieldValue::UInt(v) => Ok(*v),
            FieldValue::Int(v) if *v >= 0 => Ok(*v as u64),
            other => Err(self.type_error("unsigned integer", other)),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match &self.value {
            FieldValue::Str(s) => Ok(s),
            other => Err(self.type_error("string", other)),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match &self.value {
            FieldValue::Bool(b) => Ok(*b),
            other => Err(self.type_error("boolean", other)),
        }
    }

    pub fn as_datetime(&self) -> Result<DateTime<Utc>> {
        match &self.value {
            FieldValue::Timestamp(dt) => Ok(*dt),
            other => Err(self.type_error("timestamp", other)),
        }
    }

    fn type_error(&self, expected: &str, got: &FieldValue) -> Error {
        Error::InvalidValue {
            name: self.name.clone(),
            reason: format!("expected {expected}, got {got:?}"),
        }
    }
}

/// A child of a field set: either a leaf or a nested set.
#[derive(Debug, Clone)]
pub enum Node {
    Leaf(Field),
    Set(FieldSet),
}

impl Node {
    fn name(&self) -> &str {
        match self {
            Node::Leaf(field) => field.name(),
            Node::Set(set) => set.name(),
        }
    }
}

/// A named, ordered collection of fields with an absolute path.
#[derive(Debug, Clone)]
pub struct FieldSet {
    name: String,
    path: String,
    children: Vec<Node>,
}

impl FieldSet {
    /// Create an empty root field set. The path of a root set is `/`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: "/".to_string(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of this set inside its tree, for diagnostics.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Append a leaf field.
    pub fn push(&mut self, field: Field) -> &mut Self {
        self.children.push(Node::Leaf(field));
        self
    }

    /// Append a nested field set, rewriting its path (and recursively
    /// its children's paths) to sit under this set.
    pub fn push_set(&mut self, mut set: FieldSet) -> &mut Self {
        set.reroot(&self.path);
        self.children.push(Node::Set(set));
        self
    }

    fn reroot(&mut self, parent_path: &str) {
        self.path = if parent_path == "/" {
            format!("/{}", self.name)
        } else {
            format!("{}/{}", parent_path, self.name)
        };
        let path = self.path.clone();
        for child in &mut self.children {
            if let Node::Set(set) = child {
                set.reroot(&path);
            }
        }
    }

    /// True if a leaf or set exists at the given name or `/` path.
    pub fn has(&self, path: &str) -> bool {
        self.lookup(path).is_ok()
    }

    /// Look up a leaf field by name or `/` path.
    pub fn field(&self, path: &str) -> Result<&Field> {
        match self.lookup(path)? {
            Node::Leaf(field) => Ok(field),
            Node::Set(_) => Err(Error::InvalidValue {
                name: path.to_string(),
                reason: "expected a leaf field, found a field set".to_string(),
            }),
        }
    }

    /// Look up a nested field set by name or `/` path.
    pub fn subset(&self, path: &str) -> Result<&FieldSet> {
        match self.lookup(path)? {
            Node::Set(set) => Ok(set),
            Node::Leaf(_) => Err(Error::InvalidValue {
                name: path.to_string(),
                reason: "expected a field set, found a leaf field".to_string(),
            }),
        }
    }

    fn lookup(&self, path: &str) -> Result<&Node> {
        let mut current = self;
        let mut components = path.split('/').peekable();
        loop {
            let name = components.next().unwrap_or("");
            let node = current
                .children
                .iter()
                .find(|child| child.name() == name)
                .ok_or_else(|| Error::MissingField {
                    path: current.path.clone(),
                    name: name.to_string(),
                })?;
            if components.peek().is_none() {
                return Ok(node);
            }
            match node {
                Node::Set(set) => current = set,
                Node::Leaf(_) => {
                    return Err(Error::MissingField {
                        path: current.path.clone(),
                        name: components.next().unwrap_or("").to_string(),
                    });
                },
            }
        }
    }

    /// Iterate the nested sets of a repeated field, in declaration
    /// order: `array("file")` yields the sets named `file[0]`,
    /// `file[1]`, and so on.
    pub fn array<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a FieldSet> + 'a {
        self.children.iter().filter_map(move |child| match child {
            Node::Set(set) if is_array_item(set.name(), prefix) => Some(set),
            _ => None,
        })
    }

    /// Read an octal-encoded string field as an integer.
    ///
    /// Tar headers store numbers as NUL/space padded octal text; an
    /// all-padding field reads as zero.
    pub fn get_octal(&self, name: &str) -> Result<u64> {
        let field = self.field(name)?;
        let text = field.as_str()?;
        let trimmed = text.trim_matches(|c| c == ' ' || c == '\0');
        if trimmed.is_empty() {
            return Ok(0);
        }
        u64::from_str_radix(trimmed, 8).map_err(|err| Error::InvalidValue {
            name: name.to_string(),
            reason: format!("bad octal string {text:?}: {err}"),
        })
    }
}

fn is_array_item(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('['))
        .and_then(|rest| rest.strip_suffix(']'))
        .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
}

/// An already-parsed document: the root field set plus the declarations
/// the parser makes about itself (format kind, MIME type, byte order).
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    format: FormatKind,
    mime_type: &'static str,
    endian: Endian,
    root: FieldSet,
}

impl ParsedDocument {
    /// Wrap a root field set with the format's default MIME type and
    /// byte order.
    pub fn new(format: FormatKind, root: FieldSet) -> Self {
        Self {
            format,
            mime_type: format.mime_type(),
            endian: format.endian(),
            root,
        }
    }

    /// Override the declared byte order.
    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    pub fn format(&self) -> FormatKind {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn root(&self) -> &FieldSet {
        &self.root
    }

    pub fn has(&self, path: &str) -> bool {
        self.root.has(path)
    }

    pub fn field(&self, path: &str) -> Result<&Field> {
        self.root.field(path)
    }

    pub fn subset(&self, path: &str) -> Result<&FieldSet> {
        self.root.subset(path)
    }

    pub fn array<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a FieldSet> + 'a {
        self.root.array(prefix)
    }
}
