//! Loaded document aggregate and the decode sequence that produces it.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{describe, describe_root, DocumentShape, Entry, EntryBuilder, TreeIndex};
use crate::infrastructure::codec::DocumentCodec;

/// Placeholder shown in every column of an unresolved row.
pub const PLACEHOLDER: &str = "N/A";

/// One rendered tree row: key, type and value columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub key: String,
    pub value_type: String,
    pub value: String,
}

impl Row {
    pub fn placeholder() -> Self {
        Self {
            key: PLACEHOLDER.to_string(),
            value_type: PLACEHOLDER.to_string(),
            value: PLACEHOLDER.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.key == PLACEHOLDER && self.value_type == PLACEHOLDER && self.value == PLACEHOLDER
    }
}

/// Node-oriented data source consumed by a lazy tree renderer.
///
/// None of these fail: an unknown or malformed path yields no children,
/// is not a branch, and renders as [`Row::placeholder`].
pub trait TreeDataSource {
    fn children_keys(&self, path: &str) -> Vec<String>;
    fn is_branch(&self, path: &str) -> bool;
    fn row(&self, path: &str) -> Row;
}

/// A fully built, immutable document.
#[derive(Debug)]
pub struct Document {
    shape: DocumentShape,
    tree: TreeIndex,
    source: Option<PathBuf>,
}

impl Document {
    pub fn new(shape: DocumentShape, entries: Vec<Entry>) -> Self {
        Self {
            shape,
            tree: TreeIndex::from_entries(shape, entries),
            source: None,
        }
    }

    pub fn with_source(mut self, source: PathBuf) -> Self {
        self.source = Some(source);
        self
    }

    pub fn shape(&self) -> DocumentShape {
        self.shape
    }

    pub fn tree(&self) -> &TreeIndex {
        &self.tree
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Number of top-level entries.
    pub fn entry_count(&self) -> usize {
        self.tree.root_node().child_count()
    }

    /// Top-level entries in source order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.tree
            .root_node()
            .children
            .iter()
            .filter_map(|&idx| self.tree.node(idx))
            .map(|node| &node.entry)
    }
}

impl TreeDataSource for Document {
    fn children_keys(&self, path: &str) -> Vec<String> {
        self.tree.children_keys(path)
    }

    fn is_branch(&self, path: &str) -> bool {
        self.tree.is_branch(path)
    }

    fn row(&self, path: &str) -> Row {
        let Some(node) = self.tree.path_to_node(path) else {
            return Row::placeholder();
        };
        let description = if node.is_root() {
            describe_root(self.shape, node.child_count())
        } else {
            describe(&node.entry)
        };
        Row {
            key: node.key().to_string(),
            value_type: description.type_label().to_string(),
            value: description.display,
        }
    }
}

/// Decodes `bytes` into a document.
///
/// Shapes are tried in [`DocumentShape::DECODE_ORDER`]; the first codec success
/// wins. Nothing is built for a failed attempt.
#[instrument(level = "debug", skip_all, fields(len = bytes.len()))]
pub fn load_document<C: DocumentCodec>(codec: &C, bytes: &[u8]) -> ApplicationResult<Document> {
    let mut attempts = Vec::new();
    for shape in DocumentShape::DECODE_ORDER {
        match codec.decode(bytes, shape) {
            Ok(pairs) => {
                let entries = EntryBuilder::new().build_top_level(pairs)?;
                info!("Parsed {} document with {} entries", shape, entries.len());
                return Ok(Document::new(shape, entries));
            }
            Err(e) => {
                debug!("decode as {} failed: {}", shape, e.message);
                attempts.push(e);
            }
        }
    }
    Err(ApplicationError::DecodeFailure { attempts })
}
