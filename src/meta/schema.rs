//! The fixed metadata key schema.
//!
//! Every document built by this crate recognizes the same declared key
//! set: a static table of `(key, priority, label, formatter)` rows.
//! Writing any other key is rejected loudly, which turns extractor
//! typos into immediate failures instead of silently dropped metadata.
//!
//! The table is indexed by a compile-time perfect hash map; `SCHEMA`
//! order is declaration order, which the export uses as the tie-break
//! within equal priorities.

use crate::common::text;
use crate::meta::item::Value;
use phf::phf_map;

/// How a key derives display text from a raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    /// Plain value-to-string rendering.
    Plain,
    /// Byte counts, humanized (`"4.5 MB"`).
    FileSize,
    /// Timestamps as `YYYY-MM-DD HH:MM:SS`.
    Timestamp,
    /// Compression ratios as `"3.0x"`.
    Ratio,
}

impl TextFormat {
    /// Derive the display text for a raw value. Falls back to the plain
    /// rendering when the value's type does not match the formatter.
    pub fn render(&self, value: &Value) -> String {
        match self {
            TextFormat::Plain => value.to_text(),
            TextFormat::FileSize => match value.as_u64() {
                Some(size) => text::human_filesize(size),
                None => value.to_text(),
            },
            TextFormat::Timestamp => match value {
                Value::DateTime(dt) => text::human_datetime(dt),
                other => other.to_text(),
            },
            TextFormat::Ratio => match value.as_f64() {
                Some(rate) => format!("{rate:.1}x"),
                None => value.to_text(),
            },
        }
    }
}

/// One schema row: a recognized key with its export priority, human
/// label, and display formatter.
#[derive(Debug)]
pub struct DataDef {
    pub key: &'static str,
    pub priority: u16,
    pub label: &'static str,
    pub format: TextFormat,
}

const fn def(key: &'static str, priority: u16, label: &'static str, format: TextFormat) -> DataDef {
    DataDef {
        key,
        priority,
        label,
        format,
    }
}

/// The declared key set of every archive metadata document, in
/// declaration order.
pub static SCHEMA: &[DataDef] = &[
    def("filename", 100, "File name", TextFormat::Plain),
    def("file_size", 102, "File size", TextFormat::FileSize),
    def("file_attr", 110, "File attributes", TextFormat::Plain),
    def("file_type", 115, "File type", TextFormat::Plain),
    def("author", 120, "Author", TextFormat::Plain),
    def("creation_date", 130, "Creation date", TextFormat::Timestamp),
    def("last_modification", 131, "Last modification", TextFormat::Timestamp),
    def("comment", 140, "Comment", TextFormat::Plain),
    def("format_version", 150, "Format version", TextFormat::Plain),
    def("compression", 200, "Compression", TextFormat::Plain),
    def("compr_size", 310, "Compressed size", TextFormat::FileSize),
    def("compr_rate", 320, "Compression rate", TextFormat::Ratio),
    def("os", 400, "Operating system", TextFormat::Plain),
    def("mime_type", 600, "MIME type", TextFormat::Plain),
    def("endian", 602, "Endianness", TextFormat::Plain),
];

/// Key to `SCHEMA` index, built at compile time.
static KEY_INDEX: phf::Map<&'static str, usize> = phf_map! {
    "filename" => 0,
    "file_size" => 1,
    "file_attr" => 2,
    "file_type" => 3,
    "author" => 4,
    "creation_date" => 5,
    "last_modification" => 6,
    "comment" => 7,
    "format_version" => 8,
    "compression" => 9,
    "compr_size" => 10,
    "compr_rate" => 11,
    "os" => 12,
    "mime_type" => 13,
    "endian" => 14,
};

/// Position of a key in the schema, or `None` for an unrecognized key.
pub fn lookup(key: &str) -> Option<usize> {
    KEY_INDEX.get(key).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::item::{MAX_PRIORITY, MIN_PRIORITY};

    #[test]
    fn test_index_matches_declaration_order() {
        assert_eq!(SCHEMA.len(), KEY_INDEX.len());
        for (index, data) in SCHEMA.iter().enumerate() {
            assert_eq!(lookup(data.key), Some(index), "key {}", data.key);
        }
    }

    #[test]
    fn test_priorities_in_declared_range() {
        for data in SCHEMA {
            assert!(
                (MIN_PRIORITY..=MAX_PRIORITY).contains(&data.priority),
                "key {} priority {}",
                data.key,
                data.priority
            );
        }
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(lookup("bit_rate"), None);
    }

    #[test]
    fn test_render_formats() {
        assert_eq!(TextFormat::FileSize.render(&Value::UInt(300)), "300 bytes");
        assert_eq!(TextFormat::Ratio.render(&Value::Float(3.0)), "3.0x");
        assert_eq!(TextFormat::Plain.render(&Value::Str("x".into())), "x");
    }
}
