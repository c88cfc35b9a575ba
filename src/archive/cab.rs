//! Microsoft Cabinet metadata extraction.
//!
//! The cabinet header names its format version and folder/file counts;
//! the first folder contributes the archive-wide compression method.
//! Entries carry DOS timestamps and an attribute string with a
//! `"(none)"` sentinel for attribute-less files.

use crate::archive::max_nb_file;
use crate::common::error::Result;
use crate::field::{FieldSet, ParsedDocument};
use crate::meta::document::Metadata;
use crate::meta::safe::step;

/// Attribute sentinel of a file with no attribute bits set.
const NO_ATTRIBUTES: &str = "(none)";

pub(crate) fn populate(cab: &ParsedDocument, meta: &mut Metadata) -> Result<()> {
    if cab.has("folder[0]") {
        let folder = cab.subset("folder[0]")?;
        step(meta, "cab folder", |meta| use_folder(meta, folder));
    }
    meta.set(
        "format_version",
        format!(
            "Microsoft Cabinet version {}",
            cab.field("cab_version")?.display()
        ),
    )?;
    meta.set(
        "comment",
        format!(
            "{} folders, {} files",
            cab.field("nb_folder")?.as_u64()?,
            cab.field("nb_files")?.as_u64()?
        ),
    )?;
    let max_nb = max_nb_file(meta.quality());
    for (index, field) in cab.array("file").enumerate() {
        if let Some(max_nb) = max_nb
            && max_nb <= index
        {
            meta.warning(format!(
                "CAB archive contains many files, but only first {max_nb} files are processed"
            ));
            break;
        }
        step(meta, field.name(), |meta| use_file(meta, field));
    }
    Ok(())
}

fn use_folder(meta: &mut Metadata, folder: &FieldSet) -> Result<()> {
    let mut compression = folder.field("compr_method")?.display();
    if folder.field("compr_method")?.as_u64()? != 0 {
        compression.push_str(&format!(
            " (level {})",
            folder.field("compr_level")?.as_u64()?
        ));
    }
    meta.set("compression", compression)?;
    Ok(())
}

fn use_file(parent: &mut Metadata, field: &FieldSet) -> Result<()> {
    let mut meta = parent.child();
    meta.set("filename", field.field("filename")?.as_str()?)?;
    meta.set("file_size", field.field("filesize")?.as_u64()?)?;
    meta.set("creation_date", field.field("timestamp")?.as_datetime()?)?;
    let attributes = field.field("attributes")?.as_str()?;
    if attributes != NO_ATTRIBUTES {
        meta.set("file_attr", attributes)?;
    }
    let title = match meta.get_text("filename") {
        Some(filename) => format!("File \"{filename}\""),
        None => "File".to_string(),
    };
    parent.add_group(field.name(), meta, Some(&title));
    Ok(())
}
