//! One opened document for the duration of an extraction call.

use pdftext_core::{OpenOptions, PdfError};
use pdftext_parse::{DocumentEngine, DocumentInput, classify};
use tracing::debug;

/// An opened document handle plus its page count.
///
/// Page tasks share the session by reference; nothing in it is mutated
/// after [`open`](Self::open) returns.
pub struct DocumentSession<E: DocumentEngine> {
    doc: E::Document,
    page_count: usize,
}

impl<E: DocumentEngine> DocumentSession<E> {
    /// Classify `input` and open it with engine `E`.
    ///
    /// # Errors
    ///
    /// Returns the engine's open error converted into [`PdfError`]. This is
    /// the only fatal error of an extraction.
    pub async fn open(input: DocumentInput, options: &OpenOptions) -> Result<Self, PdfError> {
        let params = classify(input);
        let doc = E::open(params, options).await.map_err(Into::into)?;
        let page_count = E::page_count(&doc);
        debug!(page_count, "document session opened");
        Ok(Self { doc, page_count })
    }

    /// Engine-reported total page count.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn document(&self) -> &E::Document {
        &self.doc
    }

    /// Acquire page `page_number` (1-based).
    pub async fn get_page(&self, page_number: usize) -> Result<E::Page, PdfError> {
        E::get_page(&self.doc, page_number).await.map_err(Into::into)
    }
}

impl<E: DocumentEngine> std::fmt::Debug for DocumentSession<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSession")
            .field("page_count", &self.page_count)
            .finish_non_exhaustive()
    }
}
