//! Viewer session: holds the single live document.
//!
//! A load builds a complete new [`Document`] first and only then replaces the
//! current one. A failed load leaves the previous document untouched, and no
//! path from a replaced document can resolve against its successor's nodes.

use std::path::Path;

use tracing::{info, instrument};

use crate::application::document::{load_document, Document, Row, TreeDataSource};
use crate::application::services::DocumentService;
use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::codec::DocumentCodec;

#[derive(Debug, Default)]
pub struct Viewer {
    document: Option<Document>,
}

impl Viewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live document, or [`ApplicationError::NoDocument`].
    pub fn current(&self) -> ApplicationResult<&Document> {
        self.document.as_ref().ok_or(ApplicationError::NoDocument)
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    /// Replaces the live document, returning the previous one.
    pub fn publish(&mut self, document: Document) -> Option<Document> {
        self.document.replace(document)
    }

    /// Decode `bytes` and publish the result.
    #[instrument(level = "debug", skip_all)]
    pub fn load_bytes<C: DocumentCodec>(
        &mut self,
        codec: &C,
        bytes: &[u8],
    ) -> ApplicationResult<&Document> {
        let document = load_document(codec, bytes)?;
        Ok(&*self.document.insert(document))
    }

    /// Open `path` through `service` and publish the result.
    #[instrument(level = "debug", skip(self, service))]
    pub fn open<C: DocumentCodec>(
        &mut self,
        service: &DocumentService<C>,
        path: &Path,
    ) -> ApplicationResult<&Document> {
        let document = service.open(path)?;
        info!("Loaded {} document {}", document.shape(), path.display());
        Ok(&*self.document.insert(document))
    }

    /// Drops the live document.
    pub fn close(&mut self) -> Option<Document> {
        self.document.take()
    }

    /// Source path of the live document, for use as a window or header title.
    pub fn title(&self) -> Option<String> {
        self.document
            .as_ref()
            .and_then(Document::source)
            .map(|p| p.display().to_string())
    }
}

impl TreeDataSource for Viewer {
    fn children_keys(&self, path: &str) -> Vec<String> {
        self.document
            .as_ref()
            .map(|d| d.children_keys(path))
            .unwrap_or_default()
    }

    fn is_branch(&self, path: &str) -> bool {
        self.document.as_ref().is_some_and(|d| d.is_branch(path))
    }

    fn row(&self, path: &str) -> Row {
        self.document
            .as_ref()
            .map(|d| d.row(path))
            .unwrap_or_else(Row::placeholder)
    }
}
