//! Structured values subject to merging.
//!
//! A [`Structure`] is either a scalar, an ordered sequence, or a mapping from
//! string keys to structures. Containers are shared handles: cloning a
//! `Structure` clones the handle, so two clones observe each other's
//! mutations. Use [`Structure::deep_clone`] to copy the contents instead.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Key/value storage behind a mapping handle.
pub type Mapping = IndexMap<String, Structure>;

/// Shared, mutable sequence storage.
pub type SequenceHandle = Rc<RefCell<Vec<Structure>>>;

/// Shared, mutable mapping storage.
pub type MappingHandle = Rc<RefCell<Mapping>>;

#[derive(Debug, Clone, Default)]
pub enum Structure {
    /// An absent value: a missing key's value or a hole in a sequence.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(SequenceHandle),
    Mapping(MappingHandle),
}

impl Structure {
    /// Create a new, empty mapping.
    pub fn mapping() -> Self {
        Self::Mapping(Rc::new(RefCell::new(Mapping::new())))
    }

    /// Create a new, empty sequence.
    pub fn sequence() -> Self {
        Self::Sequence(Rc::new(RefCell::new(Vec::new())))
    }

    /// Build a mapping from key/value pairs. Later duplicates win.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Self)>,
        K: Into<String>,
    {
        let mapping: Mapping = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self::Mapping(Rc::new(RefCell::new(mapping)))
    }

    /// Build a sequence from items.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        Self::Sequence(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// `true` for `Null` and `Undefined`.
    pub const fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    pub const fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    pub const fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    /// `true` for sequences and mappings.
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Sequence(_) | Self::Mapping(_))
    }

    /// Whether both values are containers of the same kind.
    pub const fn same_shape(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Sequence(_), Self::Sequence(_)) | (Self::Mapping(_), Self::Mapping(_))
        )
    }

    /// A fresh empty container shaped like `self`: a sequence for sequences,
    /// a mapping for everything else.
    pub fn empty_like(&self) -> Self {
        if self.is_sequence() {
            Self::sequence()
        } else {
            Self::mapping()
        }
    }

    /// Strict identity: containers must be the same handle, scalars must be
    /// equal by value.
    pub fn identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => numbers_equal(a, b),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => Rc::ptr_eq(a, b),
            (Self::Mapping(a), Self::Mapping(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Number of entries in a container; zero for scalars.
    pub fn len(&self) -> usize {
        match self {
            Self::Sequence(items) => items.borrow().len(),
            Self::Mapping(entries) => entries.borrow().len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a key. Sequences accept canonical decimal indices.
    pub fn get(&self, key: &str) -> Option<Self> {
        match self {
            Self::Mapping(entries) => entries.borrow().get(key).cloned(),
            Self::Sequence(items) => parse_index(key).and_then(|i| items.borrow().get(i).cloned()),
            _ => None,
        }
    }

    /// Look up a sequence element.
    pub fn get_index(&self, index: usize) -> Option<Self> {
        match self {
            Self::Sequence(items) => items.borrow().get(index).cloned(),
            _ => None,
        }
    }

    /// Store `value` under `key`.
    ///
    /// Sequences only accept index keys and are padded with `Undefined` up to
    /// the index. Returns `false` when nothing was stored.
    pub fn set(&self, key: &str, value: Self) -> bool {
        match self {
            Self::Mapping(entries) => {
                entries.borrow_mut().insert(key.to_string(), value);
                true
            },
            Self::Sequence(_) => parse_index(key).is_some_and(|i| self.set_index(i, value)),
            _ => false,
        }
    }

    /// Store `value` at `index`. Mappings receive the index as a decimal key.
    pub fn set_index(&self, index: usize, value: Self) -> bool {
        match self {
            Self::Sequence(items) => {
                let mut items = items.borrow_mut();
                if index >= items.len() {
                    items.resize(index + 1, Self::Undefined);
                }
                items[index] = value;
                true
            },
            Self::Mapping(entries) => {
                entries.borrow_mut().insert(index.to_string(), value);
                true
            },
            _ => false,
        }
    }

    /// Append to a sequence. Returns `false` for anything else.
    pub fn push(&self, value: Self) -> bool {
        match self {
            Self::Sequence(items) => {
                items.borrow_mut().push(value);
                true
            },
            _ => false,
        }
    }

    /// Snapshot of the keyed entries. Sequence indices are rendered as
    /// decimal keys; scalars have no entries.
    pub fn entries(&self) -> Vec<(String, Self)> {
        match self {
            Self::Mapping(entries) => {
                entries.borrow().iter().map(|(k, v)| (k.clone(), v.clone())).collect()
            },
            Self::Sequence(items) => {
                items.borrow().iter().enumerate().map(|(i, v)| (i.to_string(), v.clone())).collect()
            },
            _ => Vec::new(),
        }
    }

    /// Snapshot of a sequence's elements; empty for anything else.
    pub fn items(&self) -> Vec<Self> {
        match self {
            Self::Sequence(items) => items.borrow().clone(),
            _ => Vec::new(),
        }
    }

    /// Recursively copy nested containers so the result shares no handle
    /// with `self`. Does not terminate on cyclic structures.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        match self {
            Self::Sequence(items) => Self::from_items(items.borrow().iter().map(Self::deep_clone)),
            Self::Mapping(entries) => Self::from_entries(
                entries.borrow().iter().map(|(k, v)| (k.clone(), v.deep_clone())),
            ),
            scalar => scalar.clone(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Convert into a JSON value, dropping `Undefined` mapping entries and
    /// turning `Undefined` sequence elements into `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Undefined | Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Sequence(items) => Value::Array(items.borrow().iter().map(Self::to_json).collect()),
            Self::Mapping(entries) => Value::Object(
                entries
                    .borrow()
                    .iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Parse a canonical sequence index: ASCII digits without leading zeros.
pub(crate) fn parse_index(key: &str) -> Option<usize> {
    let canonical = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'));
    if canonical {
        key.parse().ok()
    } else {
        None
    }
}

#[allow(clippy::float_cmp)]
fn numbers_equal(a: &Number, b: &Number) -> bool {
    // 1 and 1.0 are the same number
    a == b || matches!((a.as_f64(), b.as_f64()), (Some(x), Some(y)) if x == y)
}

/// Structural equality. Containers compare by contents; mapping key order is
/// ignored.
impl PartialEq for Structure {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Sequence(a), Self::Sequence(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Self::Mapping(a), Self::Mapping(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            _ => self.identical(other),
        }
    }
}

impl From<Value> for Structure {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::from_items(items.into_iter().map(Self::from)),
            Value::Object(entries) => {
                Self::from_entries(entries.into_iter().map(|(k, v)| (k, Self::from(v))))
            },
        }
    }
}

impl From<toml::Value> for Structure {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Self::String(s),
            toml::Value::Integer(i) => Self::Number(Number::from(i)),
            toml::Value::Float(f) => Self::from(f),
            toml::Value::Boolean(b) => Self::Bool(b),
            toml::Value::Datetime(dt) => Self::String(dt.to_string()),
            toml::Value::Array(items) => Self::from_items(items.into_iter().map(Self::from)),
            toml::Value::Table(entries) => {
                Self::from_entries(entries.into_iter().map(|(k, v)| (k, Self::from(v))))
            },
        }
    }
}

impl From<&Structure> for Value {
    fn from(structure: &Structure) -> Self {
        structure.to_json()
    }
}

impl From<bool> for Structure {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Structure {
    fn from(i: i32) -> Self {
        Self::Number(Number::from(i))
    }
}

impl From<i64> for Structure {
    fn from(i: i64) -> Self {
        Self::Number(Number::from(i))
    }
}

/// Non-finite floats have no JSON representation and become `Null`.
impl From<f64> for Structure {
    fn from(f: f64) -> Self {
        Number::from_f64(f).map_or(Self::Null, Self::Number)
    }
}

impl From<&str> for Structure {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Structure {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl Serialize for Structure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Undefined | Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Sequence(items) => {
                let items = items.borrow();
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            },
            Self::Mapping(entries) => {
                let entries = entries.borrow();
                let defined: Vec<_> = entries.iter().filter(|(_, v)| !v.is_undefined()).collect();
                let mut map = serializer.serialize_map(Some(defined.len()))?;
                for (key, value) in defined {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            },
        }
    }
}

impl<'de> Deserialize<'de> for Structure {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// Compact JSON rendering.
impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
