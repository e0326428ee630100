//! Entry tree built from a raw decoded document.

use indexmap::IndexMap;
use tracing::instrument;

use crate::domain::error::DomainError;
use crate::domain::path;
use crate::domain::value::Value;

/// Result type for entry building.
pub type EntryResult<T> = Result<T, DomainError>;

/// Immutable node of the parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Dictionary key, or the stringified index inside an array
    pub key: String,
    /// Keys from the document root down to and including this entry
    pub path: Vec<String>,
    pub value: Value,
    /// One entry per element/pair of a container, in source order; empty for leaves
    pub children: Vec<Entry>,
}

impl Entry {
    /// Entry without children.
    pub fn leaf(key: impl Into<String>, path: Vec<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            path,
            value,
            children: Vec::new(),
        }
    }

    /// Splits off the children, leaving this entry's own data.
    pub fn detach_children(mut self) -> (Entry, Vec<Entry>) {
        let children = std::mem::take(&mut self.children);
        (self, children)
    }

    /// Path string addressing this entry from the root.
    pub fn path_string(&self) -> String {
        path::from_keys(&self.path)
    }
}

/// One classification step of a raw decoded node.
#[derive(Debug)]
pub enum RawKind<N> {
    Leaf(Value),
    Array(Vec<N>),
    Dictionary(Vec<(String, N)>),
}

/// A node produced by an external codec.
///
/// Implementations map their native representation onto the closed value set.
/// A node that fits none of the variants is reported as
/// [`DomainError::Unclassifiable`].
pub trait RawNode: Sized {
    fn classify(self) -> Result<RawKind<Self>, String>;
}

/// Recursively turns raw nodes into [`Entry`] trees.
#[derive(Debug, Default, Clone, Copy)]
pub struct EntryBuilder;

impl EntryBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds the entry for `value` reached via `path_so_far`.
    ///
    /// `path_so_far` already ends with `key`.
    pub fn build<N: RawNode>(
        &self,
        key: &str,
        value: N,
        path_so_far: Vec<String>,
    ) -> EntryResult<Entry> {
        let kind = value.classify().map_err(|reason| DomainError::Unclassifiable {
            path: path::from_keys(&path_so_far),
            reason,
        })?;

        match kind {
            RawKind::Leaf(leaf) => Ok(Entry::leaf(key, path_so_far, leaf)),
            RawKind::Array(items) => {
                let children = items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| {
                        let child_key = index.to_string();
                        let child_path = extend(&path_so_far, &child_key);
                        self.build(&child_key, item, child_path)
                    })
                    .collect::<EntryResult<Vec<_>>>()?;
                let value = Value::array(children.iter().map(|c| c.value.clone()).collect());
                Ok(Entry {
                    key: key.to_string(),
                    path: path_so_far,
                    value,
                    children,
                })
            }
            RawKind::Dictionary(pairs) => {
                let children = pairs
                    .into_iter()
                    .map(|(child_key, item)| {
                        let child_path = extend(&path_so_far, &child_key);
                        self.build(&child_key, item, child_path)
                    })
                    .collect::<EntryResult<Vec<_>>>()?;
                let value = Value::dictionary(
                    children
                        .iter()
                        .map(|c| (c.key.clone(), c.value.clone()))
                        .collect::<IndexMap<_, _>>(),
                );
                Ok(Entry {
                    key: key.to_string(),
                    path: path_so_far,
                    value,
                    children,
                })
            }
        }
    }

    /// Builds one entry per top-level pair, in source order.
    #[instrument(level = "debug", skip_all)]
    pub fn build_top_level<N: RawNode>(
        &self,
        pairs: impl IntoIterator<Item = (String, N)>,
    ) -> EntryResult<Vec<Entry>> {
        pairs
            .into_iter()
            .map(|(key, value)| {
                let path = vec![key.clone()];
                self.build(&key, value, path)
            })
            .collect()
    }
}

fn extend(path: &[String], key: &str) -> Vec<String> {
    let mut out = Vec::with_capacity(path.len() + 1);
    out.extend_from_slice(path);
    out.push(key.to_string());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Minimal raw node for exercising the builder without a codec.
    #[derive(Debug, Clone)]
    enum Raw {
        Int(i64),
        Text(&'static str),
        List(Vec<Raw>),
        Map(Vec<(&'static str, Raw)>),
        Opaque,
    }

    impl RawNode for Raw {
        fn classify(self) -> Result<RawKind<Self>, String> {
            match self {
                Raw::Int(n) => Ok(RawKind::Leaf(Value::Integer(n))),
                Raw::Text(s) => Ok(RawKind::Leaf(Value::String(s.to_string()))),
                Raw::List(items) => Ok(RawKind::Array(items)),
                Raw::Map(pairs) => Ok(RawKind::Dictionary(
                    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
                )),
                Raw::Opaque => Err("opaque node".to_string()),
            }
        }
    }

    #[test]
    fn leaf_has_no_children() {
        let entry = EntryBuilder::new()
            .build("n", Raw::Int(5), vec!["n".into()])
            .unwrap();
        assert_eq!(entry.value, Value::Integer(5));
        assert!(entry.children.is_empty());
    }

    #[test]
    fn array_children_are_keyed_by_index() {
        let raw = Raw::List(vec![Raw::Text("x"), Raw::Int(2)]);
        let entry = EntryBuilder::new()
            .build("list", raw, vec!["list".into()])
            .unwrap();

        let keys: Vec<_> = entry.children.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["0", "1"]);
        assert_eq!(entry.children[1].path, ["list", "1"]);
        assert_eq!(entry.value.len(), Some(2));
    }

    #[test]
    fn dictionary_keeps_source_order() {
        let raw = Raw::Map(vec![("b", Raw::Int(1)), ("a", Raw::Int(2))]);
        let entries = EntryBuilder::new()
            .build_top_level(vec![("root".to_string(), raw)])
            .unwrap();

        let keys: Vec<_> = entries[0].children.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["b", "a"]);
        match &entries[0].value {
            Value::Dictionary(map) => {
                assert_eq!(map.keys().collect::<Vec<_>>(), ["b", "a"]);
            }
            other => panic!("expected dictionary, got {other:?}"),
        }
    }

    #[test]
    fn unclassifiable_node_reports_its_path() {
        let raw = Raw::Map(vec![("inner", Raw::List(vec![Raw::Int(1), Raw::Opaque]))]);
        let err = EntryBuilder::new()
            .build("top", raw, vec!["top".into()])
            .unwrap_err();

        assert_eq!(
            err,
            DomainError::Unclassifiable {
                path: "top/inner/1".into(),
                reason: "opaque node".into(),
            }
        );
    }

    #[test]
    fn nested_containers_share_elements_with_their_parent() {
        let raw = Raw::Map(vec![(
            "outer",
            Raw::List(vec![Raw::Map(vec![("leaf", Raw::Text("x"))])]),
        )]);
        let entry = EntryBuilder::new()
            .build("top", raw, vec!["top".into()])
            .unwrap();

        let outer = &entry.children[0];
        let (Value::Dictionary(top_map), Value::Array(outer_items)) = (&entry.value, &outer.value)
        else {
            panic!("unexpected shapes: {entry:?}");
        };
        let Value::Array(in_parent) = &top_map["outer"] else {
            panic!("outer is not an array");
        };
        assert!(Arc::ptr_eq(in_parent, outer_items));

        let inner = &outer.children[0];
        let (Value::Dictionary(in_outer), Value::Dictionary(inner_map)) = (&outer_items[0], &inner.value)
        else {
            panic!("inner is not a dictionary");
        };
        assert!(Arc::ptr_eq(in_outer, inner_map));
    }

    #[test]
    fn detach_children_keeps_value() {
        let raw = Raw::List(vec![Raw::Int(1)]);
        let entry = EntryBuilder::new().build("l", raw, vec!["l".into()]).unwrap();
        let (head, children) = entry.detach_children();
        assert!(head.children.is_empty());
        assert_eq!(head.value.len(), Some(1));
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].path_string(), "l/0");
    }
}
