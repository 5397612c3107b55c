//! Per-page work: text reconstruction, annotation collection, and the
//! failure boundary around both.

use std::panic::AssertUnwindSafe;
use std::time::Instant;

use futures::FutureExt;
use pdftext_core::{Annotation, PageResult, PdfError, reconstruct_lines};
use pdftext_parse::DocumentEngine;
use tracing::{debug, warn};

use crate::session::DocumentSession;

/// Reconstruct the line-broken text of an acquired page.
pub async fn reconstruct_text<E: DocumentEngine>(
    session: &DocumentSession<E>,
    page: &E::Page,
) -> Result<String, PdfError> {
    let fragments = E::text_content(session.document(), page).await.map_err(Into::into)?;
    Ok(reconstruct_lines(&fragments))
}

/// Flatten the annotations of an acquired page to their URLs.
pub async fn collect_annotations<E: DocumentEngine>(
    session: &DocumentSession<E>,
    page: &E::Page,
) -> Result<Vec<Annotation>, PdfError> {
    let annotations = E::page_annotations(session.document(), page)
        .await
        .map_err(Into::into)?;
    Ok(annotations.into_iter().map(Annotation::from).collect())
}

/// Process page `page_number` (1-based).
///
/// Any error or panic while acquiring the page, collecting its annotations
/// or reconstructing its text yields [`PageResult::default`].
pub async fn process_page<E: DocumentEngine>(
    session: &DocumentSession<E>,
    page_number: usize,
    include_annotations: bool,
) -> PageResult {
    let started = Instant::now();
    let body = async {
        let page = session.get_page(page_number).await?;
        let annotations = if include_annotations {
            collect_annotations(session, &page).await?
        } else {
            Vec::new()
        };
        let text = reconstruct_text(session, &page).await?;
        Ok::<_, PdfError>(PageResult { text, annotations })
    };

    match AssertUnwindSafe(body).catch_unwind().await {
        Ok(Ok(result)) => {
            debug!(
                page = page_number,
                chars = result.text.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "page processed"
            );
            result
        }
        Ok(Err(err)) => {
            debug!(page = page_number, error = %err, "page failed, using empty result");
            PageResult::default()
        }
        Err(_) => {
            warn!(page = page_number, "page task panicked, using empty result");
            PageResult::default()
        }
    }
}
