//! pdftext-core: Backend-independent data types and algorithms.
//!
//! This crate provides the foundational types (text fragments, annotations,
//! document info and XMP metadata, extraction results) and the baseline line
//! reconstruction heuristic used by pdftext. It has no required external
//! dependencies; `serde` support is behind the `serde` feature.

pub mod annotation;
pub mod error;
pub mod geometry;
pub mod metadata;
pub mod options;
pub mod result;
pub mod text;

pub use annotation::{Annotation, AnnotationType, PageAnnotation};
pub use error::PdfError;
pub use geometry::Matrix;
pub use metadata::{DocumentInfo, DocumentMetadata, InfoValue, XmpMetadata, XmpValue};
pub use options::{ExtractOptions, OpenOptions, Verbosity};
pub use result::{ExtractionResult, PageResult};
pub use text::{TextFragment, reconstruct_lines};
