//! Bzip2 metadata extraction.
//!
//! Bzip2 carries no metadata of its own; the only thing to report is
//! the compressed payload size, read from the single stream field's bit
//! size.

use crate::common::error::Result;
use crate::field::ParsedDocument;
use crate::meta::document::Metadata;

pub(crate) fn populate(bzip2: &ParsedDocument, meta: &mut Metadata) -> Result<()> {
    if bzip2.has("file") {
        meta.set("compr_size", bzip2.field("file")?.size() / 8)?;
    }
    Ok(())
}
