//! Access to per-item operation parameters.
//!
//! The host owns parameter declaration and validation; this module only
//! reads values by name for a given item and reports missing or mistyped
//! values as errors.

use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Default number of records returned when `returnAll` is off.
pub const DEFAULT_LIMIT: usize = 100;

/// Parameter-accessor capability handed to the dispatcher.
pub trait Parameters: Sync {
    /// Number of input items.
    fn item_count(&self) -> usize;

    /// Raw value of `name` for item `item`, if the item has one.
    fn value(&self, name: &str, item: usize) -> Option<&Value>;
}

/// Parameters held as one JSON object per input item.
#[derive(Debug, Clone, Default)]
pub struct JsonItems {
    items: Vec<Map<String, Value>>,
}

impl JsonItems {
    pub fn new(items: Vec<Map<String, Value>>) -> Self {
        Self { items }
    }

    /// Builds items from a JSON array of objects.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Array(entries) = value else {
            return Err(Error::invalid("items", "expected a JSON array of objects"));
        };
        let items = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| match entry {
                Value::Object(map) => Ok(map),
                _ => Err(Error::invalid("items", format!("item {i} is not an object"))),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { items })
    }

    /// Sets `name` on every item that does not define it yet.
    pub fn with_default(mut self, name: &str, value: Value) -> Self {
        for item in &mut self.items {
            item.entry(name.to_string()).or_insert_with(|| value.clone());
        }
        self
    }
}

impl Parameters for JsonItems {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn value(&self, name: &str, item: usize) -> Option<&Value> {
        self.items.get(item)?.get(name)
    }
}

/// Typed reads of the parameters of a single item.
pub struct ItemParameters<'a> {
    params: &'a dyn Parameters,
    item: usize,
}

impl<'a> ItemParameters<'a> {
    pub fn new(params: &'a dyn Parameters, item: usize) -> Self {
        Self { params, item }
    }

    fn raw(&self, name: &str) -> Option<&'a Value> {
        match self.params.value(name, self.item) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    fn missing(&self, name: &str) -> Error {
        Error::MissingParameter {
            name: name.to_string(),
            item: self.item,
        }
    }

    /// A required string parameter.
    pub fn string(&self, name: &str) -> Result<String> {
        self.optional_string(name)?
            .ok_or_else(|| self.missing(name))
    }

    /// A string parameter that may be absent. Empty strings count as absent.
    pub fn optional_string(&self, name: &str) -> Result<Option<String>> {
        self.raw(name).map_or(Ok(None), |value| as_string(name, value))
    }

    /// A boolean parameter, `default` when absent.
    pub fn bool_or(&self, name: &str, default: bool) -> Result<bool> {
        match self.raw(name) {
            None => Ok(default),
            Some(value) => as_bool(name, value),
        }
    }

    /// A positive integer parameter, `default` when absent.
    pub fn count_or(&self, name: &str, default: usize) -> Result<usize> {
        match self.raw(name) {
            None => Ok(default),
            Some(value) => as_count(name, value),
        }
    }

    /// A collection parameter (a nested object such as `filters`); empty when absent.
    pub fn collection(&self, name: &str) -> Result<Collection<'a>> {
        match self.raw(name) {
            None => Ok(Collection { name: name.to_string(), fields: None }),
            Some(Value::Object(fields)) => Ok(Collection {
                name: name.to_string(),
                fields: Some(fields),
            }),
            Some(other) => Err(Error::invalid(name, format!("expected an object, got {other}"))),
        }
    }

    /// An enumerated parameter parsed with `parse`, `default` when absent.
    pub fn choice<T>(&self, name: &str, default: T, parse: fn(&str) -> Option<T>) -> Result<T> {
        match self.optional_string(name)? {
            None => Ok(default),
            Some(value) => parse(&value)
                .ok_or_else(|| Error::invalid(name, format!("unsupported value \"{value}\""))),
        }
    }
}

/// Fields of a collection parameter.
pub struct Collection<'a> {
    name: String,
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> Collection<'a> {
    fn raw(&self, field: &str) -> Option<&'a Value> {
        match self.fields?.get(field) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    fn qualified(&self, field: &str) -> String {
        format!("{}.{}", self.name, field)
    }

    pub fn optional_string(&self, field: &str) -> Result<Option<String>> {
        self.raw(field)
            .map_or(Ok(None), |value| as_string(&self.qualified(field), value))
    }

    pub fn bool_or(&self, field: &str, default: bool) -> Result<bool> {
        match self.raw(field) {
            None => Ok(default),
            Some(value) => as_bool(&self.qualified(field), value),
        }
    }

    /// An enumerated field parsed with `parse`, `None` when absent.
    pub fn choice<T>(&self, field: &str, parse: fn(&str) -> Option<T>) -> Result<Option<T>> {
        match self.optional_string(field)? {
            None => Ok(None),
            Some(value) => parse(&value).map(Some).ok_or_else(|| {
                Error::invalid(self.qualified(field), format!("unsupported value \"{value}\""))
            }),
        }
    }
}

/// Scalars are read as their text: an all-digit id or keyword arrives as a number.
fn as_string(name: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(Error::invalid(name, format!("expected a string, got {other}"))),
    }
}

fn as_bool(name: &str, value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        other => Err(Error::invalid(name, format!("expected a boolean, got {other}"))),
    }
}

fn as_count(name: &str, value: &Value) -> Result<usize> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse::<u64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n >= 1 => Ok(n as usize),
        _ => Err(Error::invalid(name, format!("expected a positive integer, got {value}"))),
    }
}
