//! Gzip metadata extraction.
//!
//! Gzip is a single-stream format: everything of interest sits in one
//! header (method, mtime, originating OS, optional filename and
//! comment) plus the sizes needed to derive the compression rate.

use crate::archive::compute_compression_rate;
use crate::common::error::{Error, Result};
use crate::field::ParsedDocument;
use crate::meta::document::Metadata;
use crate::meta::safe::step;
use chrono::DateTime;

pub(crate) fn populate(gzip: &ParsedDocument, meta: &mut Metadata) -> Result<()> {
    step(meta, "gzip header", |meta| use_header(meta, gzip));
    compute_compression_rate(meta);
    Ok(())
}

/// Read the whole gzip header as one fault-isolated step.
fn use_header(meta: &mut Metadata, gzip: &ParsedDocument) -> Result<()> {
    meta.set("compression", gzip.field("compression")?.display())?;
    if let Ok(mtime) = gzip.field("mtime")
        && mtime.value().is_truthy()
    {
        let seconds = mtime.as_u64()?;
        let datetime = DateTime::from_timestamp(seconds as i64, 0).ok_or_else(|| {
            Error::InvalidValue {
                name: "mtime".to_string(),
                reason: format!("timestamp {seconds} out of range"),
            }
        })?;
        meta.set("last_modification", datetime)?;
    }
    meta.set("os", gzip.field("os")?.display())?;
    if gzip.field("has_filename")?.as_bool()? {
        meta.set("filename", gzip.field("filename")?.as_str()?)?;
    }
    if gzip.field("has_comment")?.as_bool()? {
        meta.set("comment", gzip.field("comment")?.as_str()?)?;
    }
    meta.set("compr_size", gzip.field("file")?.size() / 8)?;
    meta.set("file_size", gzip.field("size")?.as_u64()?)?;
    Ok(())
}
