//! Zip metadata extraction.
//!
//! Zip carries no archive-level metadata worth reporting; everything is
//! per entry. Entry sizes come from the trailing data-descriptor record
//! when one is present (streamed archives), otherwise from the local
//! header.

use crate::archive::{compute_compression_rate, max_nb_file};
use crate::common::error::Result;
use crate::field::{FieldSet, ParsedDocument};
use crate::meta::document::Metadata;
use crate::meta::safe::step;

pub(crate) fn populate(zip: &ParsedDocument, meta: &mut Metadata) -> Result<()> {
    let max_nb = max_nb_file(meta.quality());
    for (index, field) in zip.array("file").enumerate() {
        if let Some(max_nb) = max_nb
            && max_nb <= index
        {
            meta.warning(format!(
                "ZIP archive contains many files, but only first {max_nb} files are processed"
            ));
            break;
        }
        step(meta, field.name(), |meta| process_file(meta, field));
    }
    Ok(())
}

/// Extract one zip entry and attach it as a group; one fault-isolated
/// step per entry.
fn process_file(parent: &mut Metadata, field: &FieldSet) -> Result<()> {
    let mut meta = parent.child();
    meta.set("filename", field.field("filename")?.as_str()?)?;
    meta.set("creation_date", field.field("last_mod")?.as_datetime()?)?;
    meta.set("compression", field.field("compression")?.display())?;
    if field.has("data_desc") {
        meta.set(
            "file_size",
            field.field("data_desc/file_uncompressed_size")?.as_u64()?,
        )?;
        let compr_size = field.field("data_desc/file_compressed_size")?.as_u64()?;
        if compr_size != 0 {
            meta.set("compr_size", compr_size)?;
        }
    } else {
        meta.set("file_size", field.field("uncompressed_size")?.as_u64()?)?;
        let compr_size = field.field("compressed_size")?.as_u64()?;
        if compr_size != 0 {
            meta.set("compr_size", compr_size)?;
        }
    }
    compute_compression_rate(&mut meta);
    let title = format!("File \"{}\"", meta.get("filename")?.to_text());
    parent.add_group(field.name(), meta, Some(&title));
    Ok(())
}
