//! lopdf-based document engine.
//!
//! Implements [`DocumentEngine`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate. This is the default engine used by `pdftext::extract`.

use lopdf::ObjectId;
use pdftext_core::{DocumentMetadata, OpenOptions, PageAnnotation, PdfError, TextFragment};
use tracing::debug;

use crate::annotations;
use crate::engine::DocumentEngine;
use crate::error::BackendError;
use crate::info::document_info;
use crate::loader::load_bytes;
use crate::objects::get_dict;
use crate::source::DocumentParams;
use crate::text_content::{InterpreterConfig, page_fragments};
use crate::xmp::document_xmp;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: lopdf::Document,
    /// Page object ids in page order (index 0 is page 1).
    page_ids: Vec<ObjectId>,
    /// `/Encrypt` `/Filter` of the file as loaded.
    encrypt_filter: Option<String>,
    config: InterpreterConfig,
}

impl LopdfDocument {
    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }

    /// Parse a document from bytes already in memory.
    ///
    /// Encrypted documents are decrypted with the empty user password.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Parse`] if the bytes are not a readable PDF
    /// and [`PdfError::PasswordRequired`] if the empty password is rejected.
    pub fn from_bytes(bytes: &[u8], options: &OpenOptions) -> Result<Self, BackendError> {
        let mut inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        let encrypt_filter = get_dict(&inner, &inner.trailer, b"Encrypt")
            .and_then(|dict| dict.get(b"Filter").ok())
            .and_then(|filter| filter.as_name().ok())
            .map(|name| String::from_utf8_lossy(name).into_owned());

        if inner.is_encrypted() {
            inner
                .decrypt("")
                .map_err(|_| BackendError::Core(PdfError::PasswordRequired))?;
        }

        let page_ids: Vec<ObjectId> = inner.get_pages().values().copied().collect();
        debug!(pages = page_ids.len(), version = %inner.version, "opened document");

        Ok(Self {
            inner,
            page_ids,
            encrypt_filter,
            config: InterpreterConfig {
                verbosity: options.verbosity,
                max_recursion_depth: options.max_recursion_depth,
            },
        })
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .field("encrypt_filter", &self.encrypt_filter)
            .finish_non_exhaustive()
    }
}

/// A reference to a single page within a [`LopdfDocument`].
#[derive(Debug, Clone, Copy)]
pub struct LopdfPage {
    /// The lopdf object ID for this page.
    pub object_id: ObjectId,
    /// The 1-based page number.
    pub number: usize,
}

/// The lopdf-based document engine.
///
/// # Example
///
/// ```ignore
/// use pdftext_parse::{DocumentEngine, DocumentParams, LopdfEngine};
///
/// let doc = LopdfEngine::open(DocumentParams::from_data(bytes), &OpenOptions::default()).await?;
/// let page = LopdfEngine::get_page(&doc, 1).await?;
/// let fragments = LopdfEngine::text_content(&doc, &page).await?;
/// ```
pub struct LopdfEngine;

impl DocumentEngine for LopdfEngine {
    type Document = LopdfDocument;
    type Page = LopdfPage;
    type Error = BackendError;

    async fn open(params: DocumentParams, options: &OpenOptions) -> Result<Self::Document, Self::Error> {
        let bytes = load_bytes(params, options).await?;
        LopdfDocument::from_bytes(&bytes, options)
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    async fn document_metadata(doc: &Self::Document) -> Result<DocumentMetadata, Self::Error> {
        let info = document_info(&doc.inner, doc.encrypt_filter.as_deref());
        let metadata = document_xmp(&doc.inner)?;
        Ok(DocumentMetadata { info, metadata })
    }

    async fn get_page(doc: &Self::Document, page_number: usize) -> Result<Self::Page, Self::Error> {
        let page_count = doc.page_ids.len();
        let object_id = page_number
            .checked_sub(1)
            .and_then(|index| doc.page_ids.get(index))
            .copied()
            .ok_or_else(|| {
                BackendError::Core(PdfError::PageOutOfRange {
                    page: page_number,
                    page_count,
                })
            })?;
        Ok(LopdfPage {
            object_id,
            number: page_number,
        })
    }

    async fn text_content(doc: &Self::Document, page: &Self::Page) -> Result<Vec<TextFragment>, Self::Error> {
        // Let sibling page tasks make progress between interpretation runs.
        tokio::task::yield_now().await;
        page_fragments(&doc.inner, page.object_id, doc.config)
    }

    async fn page_annotations(doc: &Self::Document, page: &Self::Page) -> Result<Vec<PageAnnotation>, Self::Error> {
        tokio::task::yield_now().await;
        annotations::page_annotations(&doc.inner, page.object_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Document, Object, Stream, dictionary};

    /// Build a PDF with one page per content string.
    fn build_pdf(contents: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        });

        let mut kids = Vec::new();
        for content in contents {
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.as_bytes().to_vec()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "Contents" => Object::Reference(content_id),
            });
            kids.push(Object::Reference(page_id));
        }
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => Object::Integer(kids.len() as i64),
                "Kids" => kids,
                "Resources" => Object::Reference(resources_id),
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    async fn open(bytes: Vec<u8>) -> LopdfDocument {
        LopdfEngine::open(DocumentParams::from_data(bytes), &OpenOptions::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn opens_and_counts_pages() {
        let doc = open(build_pdf(&["BT /F1 12 Tf (a) Tj ET", "BT /F1 12 Tf (b) Tj ET"])).await;
        assert_eq!(LopdfEngine::page_count(&doc), 2);
    }

    #[tokio::test]
    async fn invalid_bytes_fail_to_open() {
        let err = LopdfEngine::open(DocumentParams::from_data(b"not a pdf".to_vec()), &OpenOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)));
    }

    #[tokio::test]
    async fn pages_are_one_based() {
        let doc = open(build_pdf(&["BT /F1 12 Tf (first) Tj ET", "BT /F1 12 Tf (second) Tj ET"])).await;
        let page = LopdfEngine::get_page(&doc, 2).await.unwrap();
        assert_eq!(page.number, 2);
        let fragments = LopdfEngine::text_content(&doc, &page).await.unwrap();
        assert_eq!(fragments[0].text, "second");
    }

    #[tokio::test]
    async fn page_zero_and_past_end_are_out_of_range() {
        let doc = open(build_pdf(&[""])).await;
        for number in [0, 2] {
            let err: PdfError = LopdfEngine::get_page(&doc, number).await.unwrap_err().into();
            assert_eq!(err, PdfError::PageOutOfRange { page: number, page_count: 1 });
        }
    }

    #[tokio::test]
    async fn inherited_resources_resolve_fonts() {
        let doc = open(build_pdf(&["BT /F1 10 Tf 1 0 0 1 50 700 Tm (Hi) Tj ET"])).await;
        let page = LopdfEngine::get_page(&doc, 1).await.unwrap();
        let fragments = LopdfEngine::text_content(&doc, &page).await.unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].baseline(), 700.0);
        assert_eq!(fragments[0].font_name.as_deref(), Some("F1"));
    }

    #[tokio::test]
    async fn metadata_reports_version_without_xmp() {
        let doc = open(build_pdf(&[""])).await;
        let meta = LopdfEngine::document_metadata(&doc).await.unwrap();
        assert_eq!(meta.info.get_text("PDFFormatVersion"), Some("1.5"));
        assert!(meta.metadata.is_none());
    }
}
