//! Document-level metadata retrieval.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use pdftext_core::{DocumentInfo, PdfError, XmpMetadata};
use pdftext_parse::DocumentEngine;
use tracing::{debug, warn};

use crate::session::DocumentSession;

/// Info and XMP metadata of a document.
///
/// Both are `None` when retrieval failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedMetadata {
    pub info: Option<DocumentInfo>,
    pub metadata: Option<XmpMetadata>,
}

/// Fetch the document metadata, absorbing any failure.
pub async fn fetch_metadata<E: DocumentEngine>(session: &DocumentSession<E>) -> FetchedMetadata {
    let fetched = AssertUnwindSafe(E::document_metadata(session.document()))
        .catch_unwind()
        .await;
    match fetched {
        Ok(Ok(meta)) => FetchedMetadata {
            info: Some(meta.info),
            metadata: meta.metadata,
        },
        Ok(Err(err)) => {
            let err: PdfError = err.into();
            debug!(error = %err, "metadata unavailable");
            FetchedMetadata::default()
        }
        Err(_) => {
            warn!("metadata retrieval panicked");
            FetchedMetadata::default()
        }
    }
}
