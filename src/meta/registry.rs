//! Extractor registry and dispatch.
//!
//! One extractor is registered per source format kind, process-wide,
//! before any extraction occurs; the table is read-only afterwards.
//! Dispatch instantiates the right document flavor, runs the format's
//! population routine with errors contained, and finishes by attaching
//! the cross-format fields every parser can report.

use crate::common::error::Result;
use crate::field::{FormatKind, ParsedDocument};
use crate::meta::document::Metadata;
use crate::meta::item::QUALITY_NORMAL;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Population routine of one format extractor.
pub type PopulateFn = fn(&ParsedDocument, &mut Metadata) -> Result<()>;

/// One registered format extractor.
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    /// Whether the format is a multi-document container (per-entry
    /// groups) or a single stream.
    pub multi: bool,
    /// The population routine writing into the document.
    pub populate: PopulateFn,
}

/// Mapping from format kind to its extractor.
#[derive(Debug, Default)]
pub struct Registry {
    extractors: HashMap<FormatKind, Extractor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the extractor for a format kind.
    ///
    /// Registering the same kind twice is a programming error and
    /// panics.
    pub fn register(&mut self, kind: FormatKind, extractor: Extractor) {
        let previous = self.extractors.insert(kind, extractor);
        assert!(previous.is_none(), "extractor for {kind:?} already registered");
        log::debug!("registered metadata extractor for {kind:?}");
    }

    /// The extractor registered for `kind`, if any.
    pub fn get(&self, kind: FormatKind) -> Option<&Extractor> {
        self.extractors.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

/// The process-wide registry, built once with every built-in format.
static EXTRACTORS: Lazy<Registry> = Lazy::new(|| {
    let mut registry = Registry::new();
    crate::archive::register_all(&mut registry);
    registry
});

/// Extract metadata from a parsed document at [`QUALITY_NORMAL`].
pub fn extract(parser: &ParsedDocument) -> Option<Metadata> {
    extract_with_quality(parser, QUALITY_NORMAL)
}

/// Extract metadata from a parsed document.
///
/// Returns `None` when no extractor is registered for the parser's
/// format (an unsupported format is a normal outcome, not an error) or
/// when population produced nothing. A failure escaping the population
/// routine is contained here: it is logged and the partially-populated
/// document is kept.
///
/// On success the parser's declared MIME type and byte-order name are
/// attached before the document is returned.
pub fn extract_with_quality(parser: &ParsedDocument, quality: f32) -> Option<Metadata> {
    let extractor = EXTRACTORS.get(parser.format())?;
    let mut metadata = if extractor.multi {
        Metadata::new_multi(quality)
    } else {
        Metadata::new(quality)
    };
    if let Err(err) = (extractor.populate)(parser, &mut metadata) {
        log::error!("error during metadata extraction: {err}");
    }
    if metadata.is_empty() {
        return None;
    }
    // Both keys are part of the fixed schema, so these writes cannot
    // fail with an unknown-key error.
    let _ = metadata.set("mime_type", parser.mime_type());
    let _ = metadata.set("endian", parser.endian().name());
    Some(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldSet;

    fn noop_populate(_: &ParsedDocument, _: &mut Metadata) -> Result<()> {
        Ok(())
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut registry = Registry::new();
        let extractor = Extractor {
            multi: false,
            populate: noop_populate,
        };
        registry.register(FormatKind::Gzip, extractor);
        assert_eq!(registry.len(), 1);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            registry.register(FormatKind::Gzip, extractor);
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_builtin_registry_covers_all_formats() {
        for kind in [
            FormatKind::Gzip,
            FormatKind::Bzip2,
            FormatKind::Zip,
            FormatKind::Tar,
            FormatKind::Cab,
            FormatKind::Mar,
        ] {
            assert!(EXTRACTORS.get(kind).is_some(), "no extractor for {kind:?}");
        }
    }

    #[test]
    fn test_extract_returns_none_when_nothing_extractable() {
        // A bzip2 tree without the single field its extractor reads
        // populates nothing.
        let parser = ParsedDocument::new(FormatKind::Bzip2, FieldSet::new("bzip2"));
        assert!(extract(&parser).is_none());
    }
}
