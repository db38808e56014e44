use std::sync::Arc;

use crate::value::Value;

static NULL: Value = Value::Null;

/// One decoded row of a resource, valid for the duration of a single scan step.
///
/// Field names are shared between rows of the same scan. Looking up a name
/// that is not part of the row yields [`Value::Null`], the same as a cell
/// that is present but empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    number: usize,
    names: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// `number` is the 1-based position of the row, header excluded.
    pub fn new(number: usize, names: Arc<[String]>, values: Vec<Value>) -> Self {
        debug_assert_eq!(names.len(), values.len(), "row width must match field names");
        Self {
            number,
            names,
            values,
        }
    }

    /// Build a row from name/value pairs.
    pub fn from_pairs<I, K, V>(number: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let (names, values): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .unzip();
        Self::new(number, names.into(), values)
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn get(&self, name: &str) -> &Value {
        self.index(name).map_or(&NULL, |idx| &self.values[idx])
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).is_present()
    }

    /// Lookup key for a field, `None` when the cell is null.
    pub fn key(&self, name: &str) -> Option<String> {
        self.get(name).as_key()
    }

    /// Whether the schema behind this row declares the field at all.
    pub fn contains_field(&self, name: &str) -> bool {
        self.index(name).is_some()
    }

    /// 1-based field position.
    pub fn field_number(&self, name: &str) -> Option<usize> {
        self.index(name).map(|idx| idx + 1)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }

    fn index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|candidate| candidate == name)
    }
}
