//! Specification normalization
//!
//! Reduces the raw value of a method group to an ordered list of
//! `MethodEntry`s. Accepted shapes:
//!
//! - absent, nil, `""` or `[]` → no entries
//! - identifier → one entry with global settings
//! - count N → `method1`..`methodN` (N ≤ 0 gives none)
//! - list of identifiers, `[name, {options}]` pairs or `{name: {options}}` maps
//!
//! Entries are produced lazily so that a bad item surfaces only once the
//! entries before it have been handed out.

use crate::error::{Error, Result};
use crate::spec::EntryOptions;
use crate::util::{counted_method_name, is_identifier};
use crate::value::Value;
use std::collections::BTreeMap;

/// One normalized method specification
#[derive(Debug, Clone, PartialEq)]
pub struct MethodEntry {
    pub name: String,
    pub options: EntryOptions,
}

impl MethodEntry {
    /// Entry that inherits every global setting
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: EntryOptions::default(),
        }
    }

    pub fn parameters(&self) -> Option<&[Value]> {
        self.options.parameters.as_deref()
    }

    /// Per-entry return value if present, otherwise the global one
    pub fn return_value<'a>(&'a self, global: Option<&'a Value>) -> Option<&'a Value> {
        self.options.return_value.as_ref().or(global)
    }

    /// Per-entry generate flag if present, otherwise the global one
    pub fn generate(&self, global: bool) -> bool {
        self.options.generate.unwrap_or(global)
    }
}

/// The shape of a method group
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MethodGroup<'a> {
    Absent,
    Name(&'a str),
    Count(i64),
    List(&'a [Value]),
}

impl<'a> MethodGroup<'a> {
    /// Classify a raw group value
    pub fn from_value(raw: Option<&'a Value>) -> Result<Self> {
        match raw {
            None | Some(Value::Nil) => Ok(MethodGroup::Absent),
            Some(Value::String(s)) | Some(Value::Symbol(s)) if s.is_empty() => {
                Ok(MethodGroup::Absent)
            }
            Some(Value::String(s)) | Some(Value::Symbol(s)) => {
                if is_identifier(s) {
                    Ok(MethodGroup::Name(s))
                } else {
                    Err(Error::invalid_spec(format!(
                        "`{}` is not a valid method name",
                        s
                    )))
                }
            }
            Some(Value::Int(n)) => Ok(MethodGroup::Count(*n)),
            Some(Value::List(items)) if items.is_empty() => Ok(MethodGroup::Absent),
            Some(Value::List(items)) => Ok(MethodGroup::List(items)),
            Some(other) => Err(Error::invalid_spec(format!(
                "expected a method name, count or list, got {} `{}`",
                other.kind(),
                other
            ))),
        }
    }

    /// Entries in declaration order
    pub fn entries(self) -> Box<dyn Iterator<Item = Result<MethodEntry>> + 'a> {
        match self {
            MethodGroup::Absent => Box::new(std::iter::empty()),
            MethodGroup::Name(name) => Box::new(normalize_name(name)),
            MethodGroup::Count(n) => Box::new(normalize_count(n)),
            MethodGroup::List(items) => Box::new(normalize_list(items)),
        }
    }
}

fn normalize_name(name: &str) -> impl Iterator<Item = Result<MethodEntry>> {
    std::iter::once(Ok(MethodEntry::named(name)))
}

fn normalize_count(n: i64) -> impl Iterator<Item = Result<MethodEntry>> {
    let count = usize::try_from(n).unwrap_or(0);
    (1..=count).map(|i| Ok(MethodEntry::named(counted_method_name(i))))
}

fn normalize_list(items: &[Value]) -> impl Iterator<Item = Result<MethodEntry>> + '_ {
    items.iter().map(normalize_item)
}

fn normalize_item(item: &Value) -> Result<MethodEntry> {
    match item {
        Value::String(_) | Value::Symbol(_) => Ok(MethodEntry::named(identifier(item)?)),
        Value::List(pair) => match pair.as_slice() {
            [name, options] => configured_entry(name, options),
            _ => Err(Error::invalid_spec(format!(
                "expected [name, options], got a list of {} items",
                pair.len()
            ))),
        },
        Value::Map(map) if map.len() == 1 => {
            let (name, options) = single_pair(map)?;
            configured_entry(&Value::String(name.clone()), options)
        }
        other => Err(Error::invalid_spec(format!(
            "list item {} `{}` is not a method name",
            other.kind(),
            other
        ))),
    }
}

fn configured_entry(name: &Value, options: &Value) -> Result<MethodEntry> {
    let name = identifier(name)?;
    let options = match options {
        Value::Map(map) => EntryOptions::from_map(map)?,
        other => {
            return Err(Error::invalid_spec(format!(
                "options for `{}` must be a mapping, got {}",
                name,
                other.kind()
            )))
        }
    };
    Ok(MethodEntry {
        name: name.to_string(),
        options,
    })
}

fn single_pair(map: &BTreeMap<String, Value>) -> Result<(&String, &Value)> {
    map.iter()
        .next()
        .ok_or_else(|| Error::invalid_spec("empty method mapping"))
}

fn identifier(value: &Value) -> Result<&str> {
    match value.as_text() {
        Some(name) if is_identifier(name) => Ok(name),
        Some(name) => Err(Error::invalid_spec(format!(
            "`{}` is not a valid method name",
            name
        ))),
        None => Err(Error::invalid_spec(format!(
            "method name must be text, got {} `{}`",
            value.kind(),
            value
        ))),
    }
}

/// Normalize a raw group value in one pass, failing on the first bad item
pub fn normalize(raw: Option<&Value>) -> Result<Vec<MethodEntry>> {
    MethodGroup::from_value(raw)?.entries().collect()
}
