//! Document engine trait.
//!
//! Defines the [`DocumentEngine`] trait that abstracts the operations the
//! extraction pipeline needs from a PDF library: open a document, report
//! its page count and metadata, acquire pages, and read each page's
//! positioned text fragments and annotations.

use std::future::Future;

use pdftext_core::{DocumentMetadata, OpenOptions, PageAnnotation, PdfError, TextFragment};

use crate::source::DocumentParams;

/// Trait abstracting a PDF document engine.
///
/// All operations are associated functions; the engine itself carries no
/// state. Every operation that may involve I/O or substantial work returns
/// a future, and those futures are `Send` so pages can be processed on a
/// multi-threaded runtime.
///
/// # Associated Types
///
/// - `Document`: An opened document. Shared by reference across all page
///   tasks of one extraction call, so it must be `Sync`.
/// - `Page`: A handle to one page of a `Document`.
/// - `Error`: Engine-specific error type, convertible to [`PdfError`].
///
/// # Usage
///
/// ```ignore
/// let doc = MyEngine::open(params, &OpenOptions::default()).await?;
/// let count = MyEngine::page_count(&doc);
/// let page = MyEngine::get_page(&doc, 1).await?;
/// let fragments = MyEngine::text_content(&doc, &page).await?;
/// ```
pub trait DocumentEngine {
    /// The opened document type.
    type Document: Send + Sync;

    /// A handle to a single page within a document.
    type Page: Send + Sync;

    /// Engine-specific error type, convertible to [`PdfError`].
    type Error: std::error::Error + Send + Into<PdfError>;

    /// Open a document from a locator or in-memory bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the locator cannot be read or the data is not a
    /// readable PDF.
    fn open(
        params: DocumentParams,
        options: &OpenOptions,
    ) -> impl Future<Output = Result<Self::Document, Self::Error>> + Send;

    /// Total number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// Read the document info mapping and XMP metadata.
    fn document_metadata(
        doc: &Self::Document,
    ) -> impl Future<Output = Result<DocumentMetadata, Self::Error>> + Send;

    /// Acquire a page by 1-based page number.
    ///
    /// # Errors
    ///
    /// Returns an error if the number is out of range or the page object
    /// cannot be loaded.
    fn get_page(
        doc: &Self::Document,
        page_number: usize,
    ) -> impl Future<Output = Result<Self::Page, Self::Error>> + Send;

    /// Positioned text fragments of a page in content-stream order.
    fn text_content(
        doc: &Self::Document,
        page: &Self::Page,
    ) -> impl Future<Output = Result<Vec<TextFragment>, Self::Error>> + Send;

    /// Native annotation objects of a page in /Annots order.
    fn page_annotations(
        doc: &Self::Document,
        page: &Self::Page,
    ) -> impl Future<Output = Result<Vec<PageAnnotation>, Self::Error>> + Send;
}
