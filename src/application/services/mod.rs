//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, DocumentCodec)
//! but are themselves concrete structs, not traits.

mod document;

pub use document::DocumentService;
