//! The metadata document: a typed, prioritized, deduplicated value
//! store, optionally owning child group documents.
//!
//! A document is created by the extractor registry (or as a child of a
//! multi-document), mutated only during a format extractor's population
//! routine, and read-only afterwards. All ordering is deterministic:
//! values in insertion order within a key, keys in
//! priority-then-declaration order on export, groups in insertion order.

use crate::common::error::{Error, Result};
use crate::meta::item::{MAX_PRIORITY, MIN_PRIORITY, Value, ValueItem};
use crate::meta::schema::{self, SCHEMA};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

/// Per-key ordered value list. One value is by far the common case.
type ValueList = SmallVec<[ValueItem; 1]>;

/// One metadata document bound to the fixed archive key schema.
///
/// Single-document constructors ([`Metadata::new`]) title the export
/// `Metadata`; the multi-document constructor ([`Metadata::new_multi`])
/// titles its own fields `Common` and accepts per-entry child groups
/// via [`Metadata::add_group`].
#[derive(Debug, Clone)]
pub struct Metadata {
    quality: f32,
    header: String,
    multi: bool,
    fields: Vec<ValueList>,
    warnings: Vec<String>,
    groups: Vec<(String, Metadata)>,
    key_counter: HashMap<String, u32>,
}

impl Metadata {
    /// Create a single-document store. `quality` is clamped into
    /// `[0.0, 1.0]`.
    pub fn new(quality: f32) -> Self {
        Self::with_header("Metadata", quality.clamp(0.0, 1.0), false)
    }

    /// Create a multi-document store (a container with per-entry
    /// groups). `quality` is clamped into `[0.0, 1.0]`.
    pub fn new_multi(quality: f32) -> Self {
        Self::with_header("Common", quality.clamp(0.0, 1.0), true)
    }

    /// Create a child document for one contained entry. The child
    /// inherits this document's quality unmodified.
    pub fn child(&self) -> Self {
        Self::with_header("Metadata", self.quality, false)
    }

    fn with_header(header: &str, quality: f32, multi: bool) -> Self {
        Self {
            quality,
            header: header.to_string(),
            multi,
            fields: vec![ValueList::new(); SCHEMA.len()],
            warnings: Vec::new(),
            groups: Vec::new(),
            key_counter: HashMap::new(),
        }
    }

    /// Extraction quality in `[0.0, 1.0]`.
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// True for documents created with [`Metadata::new_multi`].
    pub fn is_multi(&self) -> bool {
        self.multi
    }

    /// Title used for the export header line.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Override the export title.
    pub fn set_header(&mut self, header: impl Into<String>) {
        self.header = header.into();
    }

    /// Add a value under `key`.
    ///
    /// Fails with [`Error::UnknownKey`] when `key` is not part of the
    /// declared schema. A raw value equal to one already stored under
    /// the key is silently skipped; empty text values are dropped.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let index = schema::lookup(key).ok_or_else(|| Error::UnknownKey(key.to_string()))?;
        let mut value = value.into();
        if let Value::Str(text) = &mut value {
            if text.contains('\0') {
                *text = text.trim_end_matches('\0').to_string();
            }
            if text.trim().is_empty() {
                return Ok(());
            }
        }
        let values = &mut self.fields[index];
        if values.iter().any(|item| item.value() == &value) {
            return Ok(());
        }
        let text = SCHEMA[index].format.render(&value);
        values.push(ValueItem::new(value, text));
        Ok(())
    }

    /// True iff `key` is a recognized key holding at least one value.
    pub fn has(&self, key: &str) -> bool {
        schema::lookup(key).is_some_and(|index| !self.fields[index].is_empty())
    }

    /// First raw value under `key`.
    pub fn get(&self, key: &str) -> Result<&Value> {
        self.get_index(key, 0)
    }

    /// Raw value under `key` at `index` (insertion order).
    pub fn get_index(&self, key: &str, index: usize) -> Result<&Value> {
        let slot = schema::lookup(key).ok_or_else(|| Error::UnknownKey(key.to_string()))?;
        self.fields[slot]
            .get(index)
            .map(ValueItem::value)
            .ok_or_else(|| Error::MissingValue {
                key: key.to_string(),
                index,
            })
    }

    /// First display text under `key`, or `None` when absent. Text
    /// access never fails; callers supply their own fallback.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get_text_index(key, 0)
    }

    /// Display text under `key` at `index`, or `None` when absent.
    pub fn get_text_index(&self, key: &str, index: usize) -> Option<&str> {
        let slot = schema::lookup(key)?;
        self.fields[slot].get(index).map(ValueItem::text)
    }

    /// All raw values under `key`, in insertion order.
    pub fn get_values(&self, key: &str) -> Result<Vec<&Value>> {
        let slot = schema::lookup(key).ok_or_else(|| Error::UnknownKey(key.to_string()))?;
        Ok(self.fields[slot].iter().map(ValueItem::value).collect())
    }

    /// True iff every field is empty and, recursively, every child
    /// group is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|values| values.is_empty())
            && self.groups.iter().all(|(_, group)| group.is_empty())
    }

    /// Record a warning on this document and emit it on the `log`
    /// facade. Warnings mark degraded extraction (skipped steps,
    /// truncated enumeration), never hard failures.
    pub fn warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.warnings.push(message);
    }

    /// Warnings recorded during population, in order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Attach the metadata of one contained entry under `key`.
    ///
    /// Returns `false` without mutating state when `metadata` is empty
    /// (the skip is recorded as a warning). A `key` ending in the array
    /// marker `[]` is rewritten with a 1-based occurrence index per base
    /// key, so repeated entries stay distinct. A duplicate final key is
    /// also rejected.
    pub fn add_group(&mut self, key: &str, mut metadata: Metadata, title: Option<&str>) -> bool {
        if metadata.is_empty() {
            self.warning(format!("Skip empty group {key}"));
            return false;
        }
        let key = match key.strip_suffix("[]") {
            Some(base) => {
                let counter = self.key_counter.entry(base.to_string()).or_insert(0);
                *counter += 1;
                format!("{base}[{counter}]")
            },
            None => key.to_string(),
        };
        if self.groups.iter().any(|(existing, _)| *existing == key) {
            self.warning(format!("Skip group with duplicate key {key}"));
            return false;
        }
        if let Some(title) = title {
            metadata.set_header(title);
        }
        self.groups.push((key, metadata));
        true
    }

    /// True iff a group is stored under `key`.
    pub fn has_group(&self, key: &str) -> bool {
        self.groups.iter().any(|(existing, _)| existing == key)
    }

    /// The group stored under `key`, if any.
    pub fn group(&self, key: &str) -> Option<&Metadata> {
        self.groups
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, group)| group)
    }

    /// Iterate groups in insertion order.
    pub fn iter_groups(&self) -> impl Iterator<Item = (&str, &Metadata)> {
        self.groups.iter().map(|(key, group)| (key.as_str(), group))
    }

    /// Render the document as prioritized plaintext lines.
    ///
    /// Fields with a priority above the cutoff are excluded; the cutoff
    /// is clamped into `[MIN_PRIORITY, MAX_PRIORITY]` and defaults to
    /// everything. With `human` set, keys render as their labels and
    /// values as display text; otherwise keys render verbatim with
    /// plain value coercion, and group headers use the stable group key.
    ///
    /// Own fields are rendered first under a `"<title>:"` header, then
    /// each non-empty group in insertion order. Returns `None` when
    /// nothing at all was rendered.
    pub fn export_plaintext(
        &self,
        priority: Option<u16>,
        human: bool,
        line_prefix: &str,
    ) -> Option<Vec<String>> {
        self.export_with_title(priority, human, line_prefix, None)
    }

    fn export_with_title(
        &self,
        priority: Option<u16>,
        human: bool,
        line_prefix: &str,
        title: Option<&str>,
    ) -> Option<Vec<String>> {
        let cutoff = priority
            .map(|p| p.clamp(MIN_PRIORITY, MAX_PRIORITY))
            .unwrap_or(MAX_PRIORITY);
        let mut text = Vec::new();

        let mut own = vec![format!("{}:", title.unwrap_or(&self.header))];
        let mut order: Vec<usize> = (0..SCHEMA.len()).collect();
        order.sort_by_key(|&index| SCHEMA[index].priority);
        for index in order {
            let data = &SCHEMA[index];
            if data.priority > cutoff {
                break;
            }
            let name = if human { data.label } else { data.key };
            for item in &self.fields[index] {
                let value = if human {
                    item.text().to_string()
                } else {
                    item.value().to_text()
                };
                own.push(format!("{line_prefix}{name}: {value}"));
            }
        }
        if own.len() > 1 {
            text.append(&mut own);
        }

        for (key, group) in &self.groups {
            let group_title = if human { None } else { Some(key.as_str()) };
            if let Some(lines) = group.export_with_title(priority, human, line_prefix, group_title)
            {
                text.extend(lines);
            }
        }

        if text.is_empty() { None } else { Some(text) }
    }
}

impl fmt::Display for Metadata {
    /// The human plaintext export joined with newlines; empty for an
    /// empty document.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.export_plaintext(None, true, "- ") {
            Some(lines) => write!(f, "{}", lines.join("\n")),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut meta = Metadata::new(0.5);
        let err = meta.set("bit_rate", 128u64).unwrap_err();
        assert!(matches!(err, Error::UnknownKey(_)));
    }

    #[test]
    fn test_duplicate_values_are_skipped() {
        let mut meta = Metadata::new(0.5);
        meta.set("filename", "a.txt").unwrap();
        meta.set("filename", "a.txt").unwrap();
        meta.set("filename", "b.txt").unwrap();
        assert_eq!(meta.get_values("filename").unwrap().len(), 2);
        assert_eq!(meta.get("filename").unwrap().as_str(), Some("a.txt"));
        assert_eq!(
            meta.get_index("filename", 1).unwrap().as_str(),
            Some("b.txt")
        );
    }

    #[test]
    fn test_empty_text_is_dropped() {
        let mut meta = Metadata::new(0.5);
        meta.set("comment", "").unwrap();
        meta.set("comment", "   ").unwrap();
        meta.set("filename", "name\0\0").unwrap();
        assert!(!meta.has("comment"));
        assert_eq!(meta.get("filename").unwrap().as_str(), Some("name"));
    }

    #[test]
    fn test_missing_value_reads() {
        let meta = Metadata::new(0.5);
        assert!(!meta.has("filename"));
        assert!(matches!(
            meta.get("filename").unwrap_err(),
            Error::MissingValue { .. }
        ));
        assert_eq!(meta.get_text("filename"), None);
        assert_eq!(meta.get_text("filename").unwrap_or("unknown"), "unknown");
        assert!(meta.get_values("filename").unwrap().is_empty());
    }

    #[test]
    fn test_quality_is_clamped_and_inherited() {
        let meta = Metadata::new(3.5);
        assert_eq!(meta.quality(), 1.0);
        let meta = Metadata::new_multi(-1.0);
        assert_eq!(meta.quality(), 0.0);
        let parent = Metadata::new_multi(0.75);
        assert_eq!(parent.child().quality(), 0.75);
    }

    #[test]
    fn test_export_none_iff_empty() {
        let meta = Metadata::new(0.5);
        assert!(meta.export_plaintext(None, true, "- ").is_none());
        assert_eq!(meta.to_string(), "");

        let mut meta = Metadata::new(0.5);
        meta.set("filename", "a.txt").unwrap();
        let lines = meta.export_plaintext(None, true, "- ").unwrap();
        assert_eq!(lines, ["Metadata:", "- File name: a.txt"]);
    }

    #[test]
    fn test_export_priority_order_and_cutoff() {
        let mut meta = Metadata::new(0.5);
        meta.set("compr_size", 100u64).unwrap();
        meta.set("filename", "a.txt").unwrap();
        meta.set("file_size", 300u64).unwrap();
        let lines = meta.export_plaintext(None, true, "- ").unwrap();
        assert_eq!(
            lines,
            [
                "Metadata:",
                "- File name: a.txt",
                "- File size: 300 bytes",
                "- Compressed size: 100 bytes",
            ]
        );
        // A cutoff below compr_size's priority excludes it.
        let lines = meta.export_plaintext(Some(200), true, "- ").unwrap();
        assert_eq!(lines, ["Metadata:", "- File name: a.txt", "- File size: 300 bytes"]);
        // A zero cutoff is clamped up to MIN_PRIORITY, which still
        // admits the priority-100 filename field.
        let lines = meta.export_plaintext(Some(0), true, "- ").unwrap();
        assert_eq!(lines, ["Metadata:", "- File name: a.txt"]);
    }

    #[test]
    fn test_export_machine_mode() {
        let mut meta = Metadata::new(0.5);
        meta.set("file_size", 300u64).unwrap();
        let lines = meta.export_plaintext(None, false, "- ").unwrap();
        assert_eq!(lines, ["Metadata:", "- file_size: 300"]);
    }

    #[test]
    fn test_add_group_array_marker() {
        let mut meta = Metadata::new_multi(0.5);
        for name in ["a.txt", "b.txt", "c.txt"] {
            let mut entry = meta.child();
            entry.set("filename", name).unwrap();
            assert!(meta.add_group("file[]", entry, None));
        }
        let keys: Vec<_> = meta.iter_groups().map(|(key, _)| key.to_string()).collect();
        assert_eq!(keys, ["file[1]", "file[2]", "file[3]"]);
        assert!(meta.has_group("file[2]"));
        assert_eq!(
            meta.group("file[2]").unwrap().get("filename").unwrap().as_str(),
            Some("b.txt")
        );
    }

    #[test]
    fn test_add_group_rejects_empty() {
        let mut meta = Metadata::new_multi(0.5);
        let empty = meta.child();
        assert!(!meta.add_group("file[0]", empty, Some("File")));
        assert_eq!(meta.iter_groups().count(), 0);
        assert_eq!(meta.warnings(), ["Skip empty group file[0]"]);
        assert!(meta.is_empty());
    }

    #[test]
    fn test_add_group_rejects_duplicate_key() {
        let mut meta = Metadata::new_multi(0.5);
        let mut entry = meta.child();
        entry.set("filename", "a.txt").unwrap();
        assert!(meta.add_group("file[0]", entry.clone(), None));
        assert!(!meta.add_group("file[0]", entry, None));
        assert_eq!(meta.iter_groups().count(), 1);
    }

    #[test]
    fn test_multi_export_renders_groups_in_order() {
        let mut meta = Metadata::new_multi(0.5);
        meta.set("comment", "2 files").unwrap();
        for name in ["a.txt", "b.txt"] {
            let mut entry = meta.child();
            entry.set("filename", name).unwrap();
            meta.add_group("file[]", entry, Some(&format!("File \"{name}\"")));
        }
        let lines = meta.export_plaintext(None, true, "- ").unwrap();
        assert_eq!(
            lines,
            [
                "Common:",
                "- Comment: 2 files",
                "File \"a.txt\":",
                "- File name: a.txt",
                "File \"b.txt\":",
                "- File name: b.txt",
            ]
        );
        // Machine export uses stable group keys as headers.
        let lines = meta.export_plaintext(None, false, "- ").unwrap();
        assert_eq!(
            lines,
            [
                "Common:",
                "- comment: 2 files",
                "file[1]:",
                "- filename: a.txt",
                "file[2]:",
                "- filename: b.txt",
            ]
        );
    }

    #[test]
    fn test_multi_export_without_own_fields_has_no_common_header() {
        let mut meta = Metadata::new_multi(0.5);
        let mut entry = meta.child();
        entry.set("filename", "a.txt").unwrap();
        meta.add_group("file[0]", entry, None);
        let lines = meta.export_plaintext(None, true, "- ").unwrap();
        assert_eq!(lines, ["Metadata:", "- File name: a.txt"]);
    }

    #[test]
    fn test_emptiness_recurses_into_groups() {
        let mut meta = Metadata::new_multi(0.5);
        assert!(meta.is_empty());
        let mut entry = meta.child();
        entry.set("filename", "a.txt").unwrap();
        meta.add_group("file[0]", entry, None);
        assert!(!meta.is_empty());
    }

    proptest! {
        #[test]
        fn prop_set_is_dedup_idempotent(value in "[a-z][a-z0-9./_-]{0,24}", repeats in 1usize..8) {
            let mut meta = Metadata::new(0.5);
            for _ in 0..repeats {
                meta.set("filename", value.as_str()).unwrap();
            }
            prop_assert_eq!(meta.get_values("filename").unwrap().len(), 1);
        }

        #[test]
        fn prop_quality_always_clamped(quality in -10.0f32..10.0) {
            let meta = Metadata::new(quality);
            prop_assert!((0.0..=1.0).contains(&meta.quality()));
        }
    }
}
