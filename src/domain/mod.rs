//! Domain layer: document model and tree addressing
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entry;
pub mod error;
pub mod path;
pub mod presenter;
pub mod tree;
pub mod value;

pub use entry::{Entry, EntryBuilder, RawKind, RawNode};
pub use error::DomainError;
pub use presenter::{describe, describe_root, Description};
pub use tree::{TreeIndex, TreeNode, ROOT_KEY};
pub use value::{DocumentShape, Value, ValueType};
