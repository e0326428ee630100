//! Property list codec
//!
//! Turns raw bytes into top-level `(key, node)` pairs for one document shape.
//! XML and binary property lists are both accepted.

use std::io::Cursor;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::warn;

use crate::domain::{DocumentShape, RawKind, RawNode, Value};

/// A single failed decode attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{shape}: {message}")]
pub struct CodecError {
    pub shape: DocumentShape,
    pub message: String,
}

impl CodecError {
    pub fn new(shape: DocumentShape, message: impl Into<String>) -> Self {
        Self {
            shape,
            message: message.into(),
        }
    }
}

/// Decodes documents of a given root shape.
pub trait DocumentCodec: Send + Sync {
    type Node: RawNode;

    /// Top-level pairs of a `shape`-rooted document. Array elements are keyed
    /// by their stringified index.
    ///
    /// Has no side effects; a failure leaves nothing behind.
    fn decode(
        &self,
        bytes: &[u8],
        shape: DocumentShape,
    ) -> Result<Vec<(String, Self::Node)>, CodecError>;
}

/// Codec backed by the `plist` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlistCodec;

impl DocumentCodec for PlistCodec {
    type Node = plist::Value;

    fn decode(
        &self,
        bytes: &[u8],
        shape: DocumentShape,
    ) -> Result<Vec<(String, plist::Value)>, CodecError> {
        let root = plist::Value::from_reader(Cursor::new(bytes))
            .map_err(|e| CodecError::new(shape, e.to_string()))?;

        match (shape, root) {
            (DocumentShape::Dictionary, plist::Value::Dictionary(dict)) => {
                Ok(dict.into_iter().collect())
            }
            (DocumentShape::Array, plist::Value::Array(items)) => Ok(items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect()),
            (_, other) => Err(CodecError::new(
                shape,
                format!("root is {}", plist_kind(&other)),
            )),
        }
    }
}

impl RawNode for plist::Value {
    fn classify(self) -> Result<RawKind<Self>, String> {
        let leaf = match self {
            plist::Value::Array(items) => return Ok(RawKind::Array(items)),
            plist::Value::Dictionary(dict) => {
                return Ok(RawKind::Dictionary(dict.into_iter().collect()))
            }
            plist::Value::String(text) => Value::String(text),
            plist::Value::Integer(n) => match (n.as_signed(), n.as_unsigned()) {
                (Some(signed), _) => Value::Integer(signed),
                (None, Some(unsigned)) => unsigned_as_real("integer", unsigned),
                (None, None) => return Err(format!("integer {n:?} has no 64-bit form")),
            },
            plist::Value::Real(x) => Value::Real(x),
            plist::Value::Boolean(b) => Value::Boolean(b),
            plist::Value::Date(date) => Value::Date(DateTime::<Utc>::from(SystemTime::from(date))),
            plist::Value::Data(bytes) => Value::Data(bytes),
            // Keyed-archive object reference
            plist::Value::Uid(uid) => match i64::try_from(uid.get()) {
                Ok(signed) => Value::Integer(signed),
                Err(_) => unsigned_as_real("uid", uid.get()),
            },
            other => return Err(format!("unsupported {}", plist_kind(&other))),
        };
        Ok(RawKind::Leaf(leaf))
    }
}

/// Unsigned values above `i64::MAX` are kept as the nearest `f64`.
fn unsigned_as_real(kind: &str, n: u64) -> Value {
    warn!("{kind} {n} exceeds i64::MAX, shown with reduced precision");
    Value::Real(n as f64)
}

fn plist_kind(value: &plist::Value) -> &'static str {
    match value {
        plist::Value::Array(_) => "array",
        plist::Value::Dictionary(_) => "dictionary",
        plist::Value::String(_) => "string",
        plist::Value::Integer(_) => "integer",
        plist::Value::Real(_) => "real",
        plist::Value::Boolean(_) => "boolean",
        plist::Value::Date(_) => "date",
        plist::Value::Data(_) => "data",
        plist::Value::Uid(_) => "uid",
        _ => "unknown value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DICT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>b</key><integer>1</integer>
    <key>a</key><string>two</string>
</dict>
</plist>"#;

    const ARRAY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<array>
    <true/>
    <real>2.5</real>
</array>
</plist>"#;

    #[test]
    fn dictionary_strategy_keeps_key_order() {
        let pairs = PlistCodec.decode(DICT.as_bytes(), DocumentShape::Dictionary).unwrap();
        let keys: Vec<_> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn array_strategy_keys_by_index() {
        let pairs = PlistCodec.decode(ARRAY.as_bytes(), DocumentShape::Array).unwrap();
        let keys: Vec<_> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["0", "1"]);
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let err = PlistCodec
            .decode(ARRAY.as_bytes(), DocumentShape::Dictionary)
            .unwrap_err();
        assert_eq!(err.shape, DocumentShape::Dictionary);
        assert_eq!(err.message, "root is array");
    }

    #[test]
    fn garbage_fails_to_decode() {
        assert!(PlistCodec
            .decode(b"definitely not a plist", DocumentShape::Array)
            .is_err());
    }

    #[test]
    fn classify_leaves() {
        let kind = plist::Value::Integer(42i64.into()).classify().unwrap();
        assert!(matches!(kind, RawKind::Leaf(Value::Integer(42))));

        let kind = plist::Value::Uid(plist::Uid::new(7)).classify().unwrap();
        assert!(matches!(kind, RawKind::Leaf(Value::Integer(7))));

        let kind = plist::Value::Data(vec![1, 2]).classify().unwrap();
        assert!(matches!(kind, RawKind::Leaf(Value::Data(ref b)) if b.len() == 2));
    }

    #[test]
    fn oversized_integer_becomes_real() {
        let kind = plist::Value::Integer(u64::MAX.into()).classify().unwrap();
        assert!(matches!(kind, RawKind::Leaf(Value::Real(x)) if x == u64::MAX as f64));

        let kind = plist::Value::Uid(plist::Uid::new(u64::MAX)).classify().unwrap();
        assert!(matches!(kind, RawKind::Leaf(Value::Real(_))));
    }

    #[test]
    fn negative_integer_stays_signed() {
        let kind = plist::Value::Integer((-5i64).into()).classify().unwrap();
        assert!(matches!(kind, RawKind::Leaf(Value::Integer(-5))));
    }
}
