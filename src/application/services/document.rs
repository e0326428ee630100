//! Document loading service
//!
//! Reads a property list through the filesystem boundary and decodes it into a [`Document`].

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::document::{load_document, Document};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::infrastructure::codec::{DocumentCodec, PlistCodec};
use crate::infrastructure::traits::FileSystem;

/// Service for opening documents from disk.
pub struct DocumentService<C: DocumentCodec = PlistCodec> {
    fs: Arc<dyn FileSystem>,
    codec: C,
    extensions: Vec<String>,
}

impl DocumentService<PlistCodec> {
    /// Create a service using the property list codec.
    pub fn new(fs: Arc<dyn FileSystem>, extensions: Vec<String>) -> Self {
        Self::with_codec(fs, PlistCodec, extensions)
    }
}

impl<C: DocumentCodec> DocumentService<C> {
    pub fn with_codec(fs: Arc<dyn FileSystem>, codec: C, extensions: Vec<String>) -> Self {
        Self {
            fs,
            codec,
            extensions,
        }
    }

    /// Whether `path` carries one of the configured extensions (case-insensitive).
    pub fn has_known_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions.iter().any(|known| known.eq_ignore_ascii_case(ext))
    }

    /// Read and decode the document at `path`.
    ///
    /// An unfamiliar extension is only a warning; the decode decides.
    #[instrument(level = "debug", skip(self))]
    pub fn open(&self, path: &Path) -> ApplicationResult<Document> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::NotFound(path.to_path_buf()));
        }
        if !self.fs.is_file(path) {
            return Err(ApplicationError::NotAFile(path.to_path_buf()));
        }
        if !self.has_known_extension(path) {
            warn!(
                "{} does not have a known extension ({})",
                path.display(),
                self.extensions.join(", ")
            );
        }

        let bytes = self.fs.read(path).with_path_context("read document", path)?;
        debug!("open: read {} bytes from {}", bytes.len(), path.display());

        let source = self
            .fs
            .canonicalize(path)
            .unwrap_or_else(|_| path.to_path_buf());
        Ok(self.decode(&bytes)?.with_source(source))
    }

    /// Decode in-memory bytes.
    pub fn decode(&self, bytes: &[u8]) -> ApplicationResult<Document> {
        load_document(&self.codec, bytes)
    }
}
