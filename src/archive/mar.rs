//! Microsoft Archive (MAR) metadata extraction.
//!
//! MAR stores files without compression; the header contributes a file
//! count and format version, each entry a name and size.

use crate::archive::max_nb_file;
use crate::common::error::Result;
use crate::field::ParsedDocument;
use crate::meta::document::Metadata;

pub(crate) fn populate(mar: &ParsedDocument, meta: &mut Metadata) -> Result<()> {
    meta.set(
        "comment",
        format!("Contains {} files", mar.field("nb_file")?.as_u64()?),
    )?;
    meta.set(
        "format_version",
        format!(
            "Microsoft Archive version {}",
            mar.field("version")?.as_u64()?
        ),
    )?;
    let max_nb = max_nb_file(meta.quality());
    for (index, field) in mar.array("file").enumerate() {
        if let Some(max_nb) = max_nb
            && max_nb <= index
        {
            meta.warning(format!(
                "MAR archive contains many files, but only first {max_nb} files are processed"
            ));
            break;
        }
        let mut entry = meta.child();
        entry.set("filename", field.field("filename")?.as_str()?)?;
        entry.set("compression", "None")?;
        entry.set("file_size", field.field("filesize")?.as_u64()?)?;
        let title = format!(
            "File \"{}\"",
            entry.get_text("filename").unwrap_or_default()
        );
        meta.add_group(field.name(), entry, Some(&title));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, FieldSet, FieldValue, FormatKind};
    use crate::meta::item::QUALITY_BEST;
    use crate::meta::registry::extract_with_quality;

    fn mar_tree(count: u64) -> ParsedDocument {
        let mut root = FieldSet::new("mar");
        root.push(Field::new("magic", FieldValue::Str("MARC".into())));
        root.push(Field::new("version", FieldValue::UInt(3)));
        root.push(Field::new("nb_file", FieldValue::UInt(count)));
        for index in 0..count {
            let mut field = FieldSet::new(format!("file[{index}]"));
            field.push(Field::new(
                "filename",
                FieldValue::Str(format!("page{index}.htm")),
            ));
            field.push(Field::new("filesize", FieldValue::UInt(2048 + index)));
            root.push_set(field);
        }
        ParsedDocument::new(FormatKind::Mar, root)
    }

    #[test]
    fn test_mar_header_and_entries() {
        let meta = extract_with_quality(&mar_tree(2), QUALITY_BEST).unwrap();
        assert_eq!(meta.get("comment").unwrap().as_str(), Some("Contains 2 files"));
        assert_eq!(
            meta.get("format_version").unwrap().as_str(),
            Some("Microsoft Archive version 3")
        );
        assert_eq!(meta.iter_groups().count(), 2);
        let group = meta.group("file[0]").unwrap();
        assert_eq!(group.get("filename").unwrap().as_str(), Some("page0.htm"));
        assert_eq!(group.get("compression").unwrap().as_str(), Some("None"));
        assert_eq!(group.get("file_size").unwrap().as_u64(), Some(2048));
        assert_eq!(group.header(), "File \"page0.htm\"");
    }

    #[test]
    fn test_mar_header_survives_without_entries() {
        let meta = extract_with_quality(&mar_tree(0), QUALITY_BEST).unwrap();
        assert_eq!(meta.get("comment").unwrap().as_str(), Some("Contains 0 files"));
        assert_eq!(meta.iter_groups().count(), 0);
    }
}
