//! Type label and display string for entries.

use chrono::SecondsFormat;

use crate::domain::entry::Entry;
use crate::domain::value::{DocumentShape, Value, ValueType};

/// Rendered form of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub value_type: ValueType,
    pub display: String,
}

impl Description {
    pub fn type_label(&self) -> &'static str {
        self.value_type.as_str()
    }
}

/// Describes an entry's value.
pub fn describe(entry: &Entry) -> Description {
    describe_value(&entry.value)
}

pub fn describe_value(value: &Value) -> Description {
    let display = match value {
        Value::String(text) => text.clone(),
        Value::Integer(n) => n.to_string(),
        Value::Real(x) => format_real(*x),
        Value::Boolean(b) => b.to_string(),
        Value::Date(at) => at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        Value::Data(bytes) => count_label(bytes.len(), "byte", "bytes"),
        Value::Array(items) => items_label(items.len()),
        Value::Dictionary(map) => entries_label(map.len()),
    };
    Description {
        value_type: value.value_type(),
        display,
    }
}

/// Decimal exponent bounds outside which reals switch to exponent notation.
const MIN_DECIMAL_EXPONENT: i32 = -4;
const MAX_DECIMAL_EXPONENT: i32 = 21;

/// Shortest round-trip form; exponent notation when the decimal exponent is
/// below -4 or at least 21.
fn format_real(x: f64) -> String {
    if !x.is_finite() {
        return x.to_string();
    }
    let scientific = format!("{x:e}");
    let exponent = scientific
        .rsplit_once('e')
        .and_then(|(_, exp)| exp.parse::<i32>().ok())
        .unwrap_or(0);
    if (MIN_DECIMAL_EXPONENT..MAX_DECIMAL_EXPONENT).contains(&exponent) {
        x.to_string()
    } else {
        scientific
    }
}

/// Root row: the document shape and its top-level count.
pub fn describe_root(shape: DocumentShape, top_level: usize) -> Description {
    let display = match shape {
        DocumentShape::Array => items_label(top_level),
        DocumentShape::Dictionary => entries_label(top_level),
    };
    Description {
        value_type: shape.value_type(),
        display,
    }
}

pub fn items_label(n: usize) -> String {
    count_label(n, "item", "items")
}

pub fn entries_label(n: usize) -> String {
    count_label(n, "key/value entry", "key/value entries")
}

/// `"1 <singular>"`, otherwise `"<n> <plural>"`.
pub fn count_label(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}
