//! Value model: the closed set of node types a property list can hold.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// A decoded document node.
///
/// Exactly one variant is active per value. Containers keep their source order.
/// Container elements are shared: cloning an `Array` or `Dictionary` only bumps a
/// reference count, so a parent and its child entries point at the same elements.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    Data(Vec<u8>),
    Array(Arc<Vec<Value>>),
    Dictionary(Arc<IndexMap<String, Value>>),
}

impl Value {
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(items))
    }

    pub fn dictionary(map: IndexMap<String, Value>) -> Self {
        Value::Dictionary(Arc::new(map))
    }

    /// Type label shown next to the value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::String(_) => ValueType::String,
            Value::Integer(_) | Value::Real(_) => ValueType::Number,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Date(_) => ValueType::Date,
            Value::Data(_) => ValueType::Data,
            Value::Array(_) => ValueType::Array,
            Value::Dictionary(_) => ValueType::Dictionary,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Dictionary(_))
    }

    /// Number of direct elements for containers, `None` for leaves.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Array(items) => Some(items.len()),
            Value::Dictionary(map) => Some(map.len()),
            _ => None,
        }
    }
}

/// Display category of a [`Value`]. Integers and reals share `Number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Date,
    Data,
    Array,
    Dictionary,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "String",
            ValueType::Number => "Number",
            ValueType::Boolean => "Boolean",
            ValueType::Date => "Date",
            ValueType::Data => "Data",
            ValueType::Array => "Array",
            ValueType::Dictionary => "Dictionary",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentShape {
    Dictionary,
    Array,
}

impl DocumentShape {
    /// Order in which decoding is attempted.
    pub const DECODE_ORDER: [DocumentShape; 2] = [DocumentShape::Dictionary, DocumentShape::Array];

    pub fn value_type(&self) -> ValueType {
        match self {
            DocumentShape::Dictionary => ValueType::Dictionary,
            DocumentShape::Array => ValueType::Array,
        }
    }

    /// Empty container of this shape.
    pub fn empty_value(&self) -> Value {
        match self {
            DocumentShape::Dictionary => Value::dictionary(IndexMap::new()),
            DocumentShape::Array => Value::array(Vec::new()),
        }
    }
}

impl fmt::Display for DocumentShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value_type().as_str())
    }
}
