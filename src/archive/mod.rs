//! Format-specific metadata extractors.
//!
//! One module per supported container format. Each extractor reads the
//! parsed field tree of its format and writes into one metadata
//! document through the schema-checked store; all of them share the
//! quality-bounded enumeration policy and the compression-rate
//! derivation defined here.

// Submodule declarations
pub mod bzip2;
pub mod cab;
pub mod gzip;
pub mod mar;
pub mod tar;
pub mod zip;

use crate::field::FormatKind;
use crate::meta::document::Metadata;
use crate::meta::item::{QUALITY_BEST, QUALITY_FASTEST};
use crate::meta::registry::{Extractor, Registry};

/// Register every built-in format extractor.
pub(crate) fn register_all(registry: &mut Registry) {
    registry.register(
        FormatKind::Gzip,
        Extractor {
            multi: false,
            populate: gzip::populate,
        },
    );
    registry.register(
        FormatKind::Bzip2,
        Extractor {
            multi: false,
            populate: bzip2::populate,
        },
    );
    registry.register(
        FormatKind::Zip,
        Extractor {
            multi: true,
            populate: zip::populate,
        },
    );
    registry.register(
        FormatKind::Tar,
        Extractor {
            multi: true,
            populate: tar::populate,
        },
    );
    registry.register(
        FormatKind::Cab,
        Extractor {
            multi: true,
            populate: cab::populate,
        },
    );
    registry.register(
        FormatKind::Mar,
        Extractor {
            multi: true,
            populate: mar::populate,
        },
    );
}

/// Maximum number of contained files to process at the given quality:
/// `None` means unbounded.
///
/// At or below [`QUALITY_FASTEST`] no files are processed; at or above
/// [`QUALITY_BEST`] all are; in between the bound is
/// `1 + floor(10 × quality)`. The linear shape is a policy constant,
/// observable in which groups appear in the output.
pub(crate) fn max_nb_file(quality: f32) -> Option<usize> {
    if quality <= QUALITY_FASTEST {
        Some(0)
    } else if quality >= QUALITY_BEST {
        None
    } else {
        Some(1 + (10.0 * quality) as usize)
    }
}

/// Derive the compression rate when both sizes are known.
///
/// The rate is decompressed size over compressed size, set only when
/// the document holds a nonzero `file_size` and a nonzero `compr_size`;
/// partial data never fabricates a rate and zero never divides.
pub(crate) fn compute_compression_rate(meta: &mut Metadata) {
    let file_size = meta
        .get("file_size")
        .ok()
        .and_then(|value| value.as_u64())
        .filter(|size| *size != 0);
    let compr_size = meta
        .get("compr_size")
        .ok()
        .and_then(|value| value.as_u64())
        .filter(|size| *size != 0);
    if let (Some(file_size), Some(compr_size)) = (file_size, compr_size) {
        let _ = meta.set("compr_rate", file_size as f64 / compr_size as f64);
    }
}
