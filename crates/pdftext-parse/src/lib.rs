//! pdftext-parse: document engine abstraction and lopdf-backed engine.
//!
//! This crate turns a document reference into positioned text fragments,
//! annotations and metadata. [`DocumentEngine`] is the seam the extraction
//! pipeline is written against; [`LopdfEngine`] is the default engine. It
//! depends on pdftext-core for shared data types.

mod annotations;
mod cmap;
mod encoding;
pub mod engine;
pub mod error;
mod font;
mod info;
mod loader;
pub mod lopdf_engine;
mod objects;
pub mod source;
mod text_content;
mod xmp;

pub use cmap::ToUnicodeCMap;
pub use engine::DocumentEngine;
pub use error::BackendError;
pub use lopdf_engine::{LopdfDocument, LopdfEngine, LopdfPage};
pub use pdftext_core;
pub use source::{DocumentInput, DocumentParams, classify};
