//! Fault isolation for extraction steps.
//!
//! Format extractors run as a sequence of logical steps ("read one
//! entry's header", "derive one timestamp"). A failing step must not
//! poison the document: fields already set stay, and extraction moves
//! on to the next step. [`step`] is the reusable boundary; call sites
//! that need a different shape contain failures inline with the same
//! record-and-continue policy.

use crate::common::error::Result;
use crate::meta::document::Metadata;

/// Run one extraction step against `meta`, containing any failure.
///
/// On error the step's label and the error are recorded as a warning on
/// the document and `None` is returned; previously-set fields are
/// untouched.
pub(crate) fn step<T, F>(meta: &mut Metadata, what: &str, f: F) -> Option<T>
where
    F: FnOnce(&mut Metadata) -> Result<T>,
{
    match f(meta) {
        Ok(value) => Some(value),
        Err(err) => {
            meta.warning(format!("{what}: {err}"));
            None
        },
    }
}
