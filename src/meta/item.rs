//! Metadata values and the quality/priority constants.

use crate::common::text;
use chrono::{DateTime, Utc};

/// Lowest priority a schema entry may declare.
pub const MIN_PRIORITY: u16 = 100;
/// Highest priority a schema entry may declare; also the default export
/// cutoff (include everything).
pub const MAX_PRIORITY: u16 = 999;

/// Quality knob presets. Quality trades extraction completeness for
/// speed; for container formats it bounds how many entries are visited.
pub const QUALITY_FASTEST: f32 = 0.0;
pub const QUALITY_FAST: f32 = 0.25;
pub const QUALITY_NORMAL: f32 = 0.5;
pub const QUALITY_GOOD: f32 = 0.75;
pub const QUALITY_BEST: f32 = 1.0;

/// Raw value of one metadata datum.
///
/// Equality on `Value` is raw-value equality and is what the per-key
/// deduplication in the value store keys on.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    UInt(u64),
    Int(i64),
    Float(f64),
    Str(String),
    DateTime(DateTime<Utc>),
}

impl Value {
    /// Plain, locale-free text coercion used for non-human export.
    pub fn to_text(&self) -> String {
        match self {
            Value::UInt(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Str(s) => text::make_printable(s),
            Value::DateTime(dt) => text::human_datetime(dt),
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt(v) => Some(*v),
            Value::Int(v) if *v >= 0 => Some(*v as u64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::UInt(v) => Some(*v as f64),
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::UInt(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::UInt(value as u64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

/// One extracted datum: the raw value plus the display text derived at
/// insertion time by the owning key's formatter. Immutable once built.
#[derive(Debug, Clone)]
pub struct ValueItem {
    value: Value,
    text: String,
}

impl ValueItem {
    pub(crate) fn new(value: Value, text: String) -> Self {
        Self { value, text }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
