//! String-keyed lexer properties.
//!
//! Hosts configure lexers with `key = value` strings (`fold.comment=1`). A lexer declares
//! the keys it understands in a static [`OptionDef`] table and keeps the parsed values in
//! a plain struct; [`OptionSet`] does the bookkeeping between the two.

use std::collections::BTreeMap;

/// The value type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyType {
    /// `0` / non-zero.
    #[default]
    Boolean,
    /// A signed integer.
    Integer,
    /// Free text.
    String,
}

/// One property a lexer understands.
pub struct OptionDef<T: 'static> {
    /// Property key.
    pub name: &'static str,
    /// Value type.
    pub kind: PropertyType,
    /// Human-readable description.
    pub description: &'static str,
    /// Parse `value` into the options struct, returning whether the parsed value changed.
    pub set: fn(&mut T, &str) -> bool,
}

/// Property bookkeeping for one lexer instance.
#[derive(Debug, Clone)]
pub struct OptionSet<T: 'static> {
    defs: &'static [OptionDef<T>],
    names: String,
    values: BTreeMap<&'static str, String>,
}

impl<T> std::fmt::Debug for OptionDef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl<T> OptionSet<T> {
    /// Build from a static definition table.
    pub fn new(defs: &'static [OptionDef<T>]) -> Self {
        let names = defs.iter().map(|d| d.name).collect::<Vec<_>>().join("\n");
        Self {
            defs,
            names,
            values: BTreeMap::new(),
        }
    }

    fn find(&self, name: &str) -> Option<&'static OptionDef<T>> {
        self.defs.iter().find(|d| d.name == name)
    }

    /// All property keys, `'\n'`-separated.
    pub fn property_names(&self) -> &str {
        &self.names
    }

    /// Type of a property (boolean for unknown keys).
    pub fn property_type(&self, name: &str) -> PropertyType {
        self.find(name).map(|d| d.kind).unwrap_or_default()
    }

    /// Description of a property (empty for unknown keys).
    pub fn describe_property(&self, name: &str) -> &'static str {
        self.find(name).map_or("", |d| d.description)
    }

    /// Apply `value` to `target`. Returns `true` when the property is known and the value
    /// differs from the one previously set, meaning styled text may be stale.
    pub fn property_set(&mut self, target: &mut T, name: &str, value: &str) -> bool {
        let Some(def) = self.find(name) else {
            return false;
        };
        if self.values.get(def.name).is_some_and(|v| v == value) {
            return false;
        }
        self.values.insert(def.name, value.to_string());
        (def.set)(target, value)
    }

    /// The last value set for a property.
    pub fn property_get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Parse a leading integer the way C `atoi` does: optional sign then digits, anything
/// else yields 0.
pub fn parse_int(value: &str) -> i32 {
    let trimmed = value.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1i64, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let mut acc: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        acc = (acc * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
    }
    (sign * acc).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Store a boolean property, returning whether it changed.
pub fn set_bool(slot: &mut bool, value: &str) -> bool {
    let new = parse_int(value) != 0;
    std::mem::replace(slot, new) != new
}

/// Store an integer property, returning whether it changed.
pub fn set_int(slot: &mut i32, value: &str) -> bool {
    let new = parse_int(value);
    std::mem::replace(slot, new) != new
}

/// Store a string property, returning whether it changed.
pub fn set_string(slot: &mut String, value: &str) -> bool {
    if slot == value {
        return false;
    }
    *slot = value.to_string();
    true
}

/// A plain ordered string map with integer lookups, used for configuration layers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    values: BTreeMap<String, String>,
}

impl PropertyMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, returning the previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    /// Get a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Get a value parsed as an integer, or `default` when absent.
    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        self.get(key).map_or(default, parse_int)
    }

    /// Iterate in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
