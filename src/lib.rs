//! Rambutan - A Rust library for extracting metadata from archive file formats
//!
//! This library turns already-parsed archive containers (gzip, bzip2, zip,
//! tar, cab, mar) into prioritized, human-presentable metadata: a typed
//! key-value store with deduplication, per-entry groups for container
//! formats, and a plaintext export whose line format is stable enough for
//! other tooling to parse.
//!
//! # Features
//!
//! - **Unified document model**: one schema-checked value store for every
//!   format, with priority-ranked keys and deterministic ordering
//! - **Per-entry groups**: container formats attach one child document per
//!   contained file, with automatic key disambiguation
//! - **Quality knob**: a `[0.0, 1.0]` parameter bounding how many entries
//!   of a large archive are visited
//! - **Best-effort extraction**: every extraction step is fault-isolated;
//!   a broken field never discards the metadata already gathered
//!
//! # Example - Extracting gzip metadata
//!
//! ```
//! use rambutan::field::{Field, FieldSet, FieldValue, FormatKind, ParsedDocument};
//! use rambutan::meta::extract;
//!
//! // A parsed gzip header, as a binary parser would materialize it.
//! let mut root = FieldSet::new("gzip");
//! root.push(Field::new("compression", FieldValue::UInt(8)).with_display("deflate"));
//! root.push(Field::new("os", FieldValue::UInt(3)).with_display("Unix"));
//! root.push(Field::new("has_filename", FieldValue::Bool(true)));
//! root.push(Field::new("has_comment", FieldValue::Bool(false)));
//! root.push(Field::new("filename", FieldValue::Str("notes.txt".into())));
//! root.push(Field::opaque("file", 100 * 8));
//! root.push(Field::new("size", FieldValue::UInt(300)));
//!
//! let parser = ParsedDocument::new(FormatKind::Gzip, root);
//! let metadata = extract(&parser).expect("gzip is a supported format");
//!
//! assert_eq!(metadata.get_text("compression"), Some("deflate"));
//! assert_eq!(metadata.get_text("compr_rate"), Some("3.0x"));
//! for line in metadata.export_plaintext(None, true, "- ").unwrap() {
//!     println!("{line}");
//! }
//! ```
//!
//! # Example - Querying a container's entries
//!
//! ```
//! use rambutan::field::{Field, FieldSet, FieldValue, FormatKind, ParsedDocument};
//! use rambutan::meta::{QUALITY_BEST, extract_with_quality};
//!
//! let mut root = FieldSet::new("mar");
//! root.push(Field::new("version", FieldValue::UInt(3)));
//! root.push(Field::new("nb_file", FieldValue::UInt(1)));
//! let mut entry = FieldSet::new("file[0]");
//! entry.push(Field::new("filename", FieldValue::Str("index.htm".into())));
//! entry.push(Field::new("filesize", FieldValue::UInt(2048)));
//! root.push_set(entry);
//!
//! let parser = ParsedDocument::new(FormatKind::Mar, root);
//! let metadata = extract_with_quality(&parser, QUALITY_BEST).unwrap();
//!
//! for (key, group) in metadata.iter_groups() {
//!     println!("{key}: {:?}", group.get_text("filename"));
//! }
//! ```

/// Common error types and human-readable text conversions shared across
/// the engine.
pub mod common;

/// The field-tree interface consumed from binary parsers: typed leaves,
/// nested sets, lazy item sequences, and the parsed-document wrapper.
pub mod field;

/// The metadata aggregation engine: documents, schema, registry, and
/// the dispatch entry points.
pub mod meta;

/// Format-specific metadata extractors (gzip, bzip2, zip, tar, cab,
/// mar).
pub mod archive;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use field::{Field, FieldSet, FieldValue, FormatKind, ParsedDocument};
pub use meta::{Metadata, extract, extract_with_quality};
