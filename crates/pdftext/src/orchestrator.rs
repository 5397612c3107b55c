//! Concurrent, order-preserving processing of a document's pages.

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use pdftext_core::{Annotation, ExtractOptions, PageResult};
use pdftext_parse::DocumentEngine;
use tracing::debug;

use crate::page::process_page;
use crate::session::DocumentSession;

/// Text and annotations of the processed pages, in page order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageOutputs {
    pub text: Vec<String>,
    /// `None` unless annotations were requested.
    pub annotations: Option<Vec<Annotation>>,
}

/// Process pages `1..=min(max_pages, page_count)` concurrently.
///
/// All page futures are started up front and polled together on the
/// current task. Results land in slots keyed by page index, so the output
/// order is page order whatever the completion order.
pub async fn run_pages<E: DocumentEngine>(
    session: &DocumentSession<E>,
    options: &ExtractOptions,
) -> PageOutputs {
    let count = options.processed_page_count(session.page_count());
    let include_annotations = options.include_annotations;
    debug!(count, total = session.page_count(), "processing pages");

    let mut slots: Vec<Option<PageResult>> = Vec::new();
    slots.resize_with(count, || None);

    let mut tasks: FuturesUnordered<_> = (1..=count)
        .map(|page_number| async move {
            (page_number, process_page(session, page_number, include_annotations).await)
        })
        .collect();

    while let Some((page_number, result)) = tasks.next().await {
        slots[page_number - 1] = Some(result);
    }

    let mut text = Vec::with_capacity(count);
    let mut annotations = include_annotations.then(Vec::new);
    for result in slots.into_iter().map(Option::unwrap_or_default) {
        text.push(result.text);
        if let Some(all) = annotations.as_mut() {
            all.extend(result.annotations);
        }
    }

    PageOutputs { text, annotations }
}
