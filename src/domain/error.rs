//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the document model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The codec handed over a node outside the closed value set.
    #[error("unclassifiable value at '{path}': {reason}")]
    Unclassifiable { path: String, reason: String },
}
