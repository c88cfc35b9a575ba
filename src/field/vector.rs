//! Lazy homogeneous item sequences.
//!
//! A [`GenericVector`] describes a fixed-count run of uniformly-typed,
//! fixed-size items inside a parsed format (the file table of an
//! archive, a palette, an index). Items are not materialized up front:
//! the vector knows its item count and item size, and produces
//! positionally-named item slots on demand. Parsers use the slots to
//! decode individual items only when they are actually visited.

use crate::common::error::{Error, Result};
use crate::field::FieldSet;

/// Shape of one item in a vector: a type name for diagnostics and the
/// fixed encoded size in bits.
#[derive(Debug, Clone, Copy)]
pub struct ItemDescriptor {
    pub type_name: &'static str,
    pub size: u64,
}

impl ItemDescriptor {
    pub const fn new(type_name: &'static str, size: u64) -> Self {
        Self { type_name, size }
    }
}

/// One positionally-labeled slot produced by a vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorItem {
    name: String,
    offset: u64,
    size: u64,
}

impl VectorItem {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Offset of the item from the start of the vector, in bits.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Encoded size of the item in bits.
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// A fixed-count lazy sequence of uniformly-typed sub-fields.
#[derive(Debug, Clone)]
pub struct GenericVector {
    name: String,
    nb_items: usize,
    item: ItemDescriptor,
    item_name: String,
}

impl GenericVector {
    /// Declare a vector of `nb_items` items under `parent`.
    ///
    /// Fails immediately when `nb_items` is zero, naming the offending
    /// field and its location; an empty run must be represented by the
    /// absence of the vector, not by a zero-length one.
    pub fn new(
        parent: &FieldSet,
        name: impl Into<String>,
        nb_items: usize,
        item: ItemDescriptor,
        item_name: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        if nb_items == 0 {
            return Err(Error::EmptyVector {
                name,
                path: parent.path().to_string(),
            });
        }
        debug_assert!(item.size > 0, "item type {} has no static size", item.type_name);
        Ok(Self {
            name,
            nb_items,
            item,
            item_name: item_name.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of items; always at least one.
    pub fn len(&self) -> usize {
        self.nb_items
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Total encoded size of the vector in bits.
    pub fn size(&self) -> u64 {
        self.nb_items as u64 * self.item.size
    }

    /// Produce the slot at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<VectorItem> {
        if index >= self.nb_items {
            return None;
        }
        Some(VectorItem {
            name: format!("{}[{index}]", self.item_name),
            offset: index as u64 * self.item.size,
            size: self.item.size,
        })
    }

    /// Iterate all slots in order. Slots are produced on demand; nothing
    /// is allocated for items the caller never reaches.
    pub fn iter(&self) -> impl Iterator<Item = VectorItem> + '_ {
        (0..self.nb_items).map(|index| VectorItem {
            name: format!("{}[{index}]", self.item_name),
            offset: index as u64 * self.item.size,
            size: self.item.size,
        })
    }
}
