//! pdftext: Extract page count, metadata, line-broken text and annotations
//! from PDF documents.
//!
//! This is the public API facade crate. It re-exports types from
//! pdftext-core and drives a [`DocumentEngine`] from pdftext-parse.
//!
//! # Architecture
//!
//! - **pdftext-core**: Backend-independent data types and the line
//!   reconstruction heuristic
//! - **pdftext-parse**: The engine trait and the lopdf-backed engine
//! - **pdftext** (this crate): Document session, concurrent page
//!   orchestration and per-page failure isolation
//!
//! # Example
//!
//! ```ignore
//! let result = pdftext::extract("report.pdf", ExtractOptions::new().with_max_pages(5)).await?;
//! println!("{} pages, first: {}", result.num_pages, result.text[0]);
//! ```

pub mod metadata;
pub mod orchestrator;
pub mod page;
pub mod session;

pub use pdftext_core;
pub use pdftext_parse;

pub use metadata::{FetchedMetadata, fetch_metadata};
pub use orchestrator::{PageOutputs, run_pages};
pub use page::process_page;
pub use pdftext_core::{
    Annotation, DocumentInfo, ExtractOptions, ExtractionResult, InfoValue, OpenOptions, PageResult, PdfError,
    TextFragment, Verbosity, XmpMetadata, XmpValue, reconstruct_lines,
};
pub use pdftext_parse::{DocumentEngine, DocumentInput, DocumentParams, LopdfEngine, classify};
pub use session::DocumentSession;

use tracing::{info, instrument};

/// Extract a document with the default lopdf engine.
///
/// `input` may be PDF bytes, a path, or an `http(s)://` / `file://` URL.
/// The document is opened with [`Verbosity::Errors`].
///
/// # Errors
///
/// Only a failure to open the document is returned. Metadata and per-page
/// failures are absorbed into the result.
pub async fn extract(
    input: impl Into<DocumentInput>,
    options: ExtractOptions,
) -> Result<ExtractionResult, PdfError> {
    extract_with::<LopdfEngine>(input, options, &OpenOptions::default()).await
}

/// Extract a document with engine `E` and explicit open options.
///
/// Metadata retrieval runs concurrently with page processing; both finish
/// before the result is assembled.
///
/// # Errors
///
/// Returns the engine's open error converted into [`PdfError`].
#[instrument(level = "info", name = "pdftext::extract", skip_all)]
pub async fn extract_with<E: DocumentEngine>(
    input: impl Into<DocumentInput>,
    options: ExtractOptions,
    open_options: &OpenOptions,
) -> Result<ExtractionResult, PdfError> {
    let session = DocumentSession::<E>::open(input.into(), open_options).await?;
    let num_pages = session.page_count();

    let (fetched, pages) = futures::join!(fetch_metadata(&session), run_pages(&session, &options));

    info!(
        num_pages,
        processed = pages.text.len(),
        annotations = pages.annotations.as_ref().map(Vec::len),
        "extraction complete"
    );

    Ok(ExtractionResult {
        num_pages,
        info: fetched.info,
        metadata: fetched.metadata,
        text: pages.text,
        annotations: pages.annotations,
    })
}
