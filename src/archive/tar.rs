//! Tar metadata extraction.
//!
//! Tar headers are octal text throughout: mode, sizes, timestamps, and
//! ownership ids all decode through the octal accessor. A header with a
//! garbled timestamp still yields a useful entry, so the timestamp is
//! strictly best-effort.

use crate::archive::max_nb_file;
use crate::common::error::Result;
use crate::common::text::human_unix_attributes;
use crate::field::{FieldSet, ParsedDocument};
use crate::meta::document::Metadata;
use chrono::DateTime;

pub(crate) fn populate(tar: &ParsedDocument, meta: &mut Metadata) -> Result<()> {
    let max_nb = max_nb_file(meta.quality());
    for (index, field) in tar.array("file").enumerate() {
        if let Some(max_nb) = max_nb
            && max_nb <= index
        {
            meta.warning(format!(
                "TAR archive contains many files, but only first {max_nb} files are processed"
            ));
            break;
        }
        let mut entry = meta.child();
        if let Err(err) = extract_file(field, &mut entry) {
            meta.warning(format!("{}: {err}", field.name()));
        }
        let title = match entry.get_text("filename") {
            Some(filename) => format!("File \"{filename}\""),
            None => "File".to_string(),
        };
        meta.add_group(field.name(), entry, Some(&title));
    }
    Ok(())
}

/// Extract one tar header into `meta`; failures are contained by the
/// caller and whatever was set so far still forms the entry's group.
fn extract_file(field: &FieldSet, meta: &mut Metadata) -> Result<()> {
    meta.set("filename", field.field("name")?.as_str()?)?;
    meta.set(
        "file_attr",
        human_unix_attributes(field.get_octal("mode")? as u32),
    )?;
    meta.set("file_size", field.get_octal("size")?)?;
    if let Ok(mtime) = field.get_octal("mtime")
        && mtime != 0
        && let Some(datetime) = DateTime::from_timestamp(mtime as i64, 0)
    {
        meta.set("last_modification", datetime)?;
    }
    meta.set("file_type", field.field("type")?.display())?;
    meta.set(
        "author",
        format!(
            "{} (uid={}), group {} (gid={})",
            field.field("uname")?.as_str()?,
            field.get_octal("uid")?,
            field.field("gname")?.as_str()?,
            field.get_octal("gid")?
        ),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, FieldValue, FormatKind};
    use crate::meta::item::QUALITY_BEST;
    use crate::meta::registry::extract_with_quality;

    fn tar_entry(index: usize, name: &str, mtime: &str) -> FieldSet {
        let mut field = FieldSet::new(format!("file[{index}]"));
        field.push(Field::new("name", FieldValue::Str(name.into())));
        field.push(Field::new("mode", FieldValue::Str("0000755\0".into())));
        field.push(Field::new("uid", FieldValue::Str("0000000\0".into())));
        field.push(Field::new("gid", FieldValue::Str("0000000\0".into())));
        field.push(Field::new("size", FieldValue::Str("00000454\0".into())));
        field.push(Field::new("mtime", FieldValue::Str(mtime.into())));
        field.push(Field::new("type", FieldValue::Str("0".into())).with_display("Normal disk file"));
        field.push(Field::new("uname", FieldValue::Str("root\0".into())));
        field.push(Field::new("gname", FieldValue::Str("root\0".into())));
        field
    }

    #[test]
    fn test_tar_entry_fields() {
        let mut root = FieldSet::new("tar");
        root.push_set(tar_entry(0, "etc/motd", "10447326425\0"));
        let parser = ParsedDocument::new(FormatKind::Tar, root);
        let meta = extract_with_quality(&parser, QUALITY_BEST).unwrap();
        let group = meta.group("file[0]").unwrap();
        assert_eq!(group.get("filename").unwrap().as_str(), Some("etc/motd"));
        assert_eq!(group.get_text("file_attr"), Some("-rwxr-xr-x (755)"));
        assert_eq!(group.get("file_size").unwrap().as_u64(), Some(0o454));
        assert_eq!(group.get_text("file_type"), Some("Normal disk file"));
        assert_eq!(
            group.get("author").unwrap().as_str(),
            Some("root (uid=0), group root (gid=0)")
        );
        assert!(group.has("last_modification"));
        assert_eq!(group.header(), "File \"etc/motd\"");
        assert_eq!(meta.get_text("endian"), Some("Big endian"));
    }

    #[test]
    fn test_invalid_mtime_is_silently_skipped() {
        let mut root = FieldSet::new("tar");
        root.push_set(tar_entry(0, "etc/motd", "xyz!!\0"));
        root.push_set(tar_entry(1, "etc/hosts", "0\0"));
        let parser = ParsedDocument::new(FormatKind::Tar, root);
        let meta = extract_with_quality(&parser, QUALITY_BEST).unwrap();
        let group = meta.group("file[0]").unwrap();
        assert!(!group.has("last_modification"));
        // Everything after the timestamp was still extracted.
        assert!(group.has("author"));
        let group = meta.group("file[1]").unwrap();
        assert!(!group.has("last_modification"));
    }

    #[test]
    fn test_partial_entry_is_kept() {
        // A header with no uname still yields a group with the fields
        // set before the failure.
        let mut field = FieldSet::new("file[0]");
        field.push(Field::new("name", FieldValue::Str("broken".into())));
        field.push(Field::new("mode", FieldValue::Str("0000644\0".into())));
        field.push(Field::new("size", FieldValue::Str("0000010\0".into())));
        field.push(Field::new("mtime", FieldValue::Str("0\0".into())));
        field.push(Field::new("type", FieldValue::Str("0".into())));
        let mut root = FieldSet::new("tar");
        root.push_set(field);
        let parser = ParsedDocument::new(FormatKind::Tar, root);
        let meta = extract_with_quality(&parser, QUALITY_BEST).unwrap();
        let group = meta.group("file[0]").unwrap();
        assert_eq!(group.get("filename").unwrap().as_str(), Some("broken"));
        assert_eq!(group.get_text("file_attr"), Some("-rw-r--r-- (644)"));
        assert!(!group.has("author"));
        assert_eq!(meta.warnings().len(), 1);
        assert_eq!(group.header(), "File \"broken\"");
    }

    #[test]
    fn test_quality_bound_truncates() {
        let mut root = FieldSet::new("tar");
        for index in 0..8 {
            root.push_set(tar_entry(index, &format!("f{index}"), "0\0"));
        }
        let parser = ParsedDocument::new(FormatKind::Tar, root);
        let meta = extract_with_quality(&parser, 0.1).unwrap();
        assert_eq!(meta.iter_groups().count(), 2);
        assert_eq!(
            meta.warnings(),
            ["TAR archive contains many files, but only first 2 files are processed"]
        );
    }
}
