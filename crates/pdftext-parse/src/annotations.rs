//! Page annotation extraction.

use lopdf::{Document, ObjectId};
use pdftext_core::PageAnnotation;

use crate::error::BackendError;
use crate::objects::{get_dict, get_name, get_text, resolve_object};

/// Extract the annotations of a page in `/Annots` order.
///
/// Entries that do not resolve to a dictionary are skipped. The URL is
/// taken from a `/URI` action in `/A`; other annotations have none.
pub(crate) fn page_annotations(doc: &Document, page_id: ObjectId) -> Result<Vec<PageAnnotation>, BackendError> {
    let page = doc
        .get_object(page_id)
        .and_then(|o| o.as_dict())
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

    let annots = match page.get(b"Annots") {
        Ok(obj) => resolve_object(doc, obj),
        Err(_) => return Ok(Vec::new()),
    };
    let entries = annots
        .as_array()
        .map_err(|e| BackendError::Parse(format!("/Annots is not an array: {e}")))?;

    let annotations = entries
        .iter()
        .filter_map(|entry| resolve_object(doc, entry).as_dict().ok())
        .map(|dict| {
            let subtype = get_name(doc, dict, b"Subtype")
                .map(|name| String::from_utf8_lossy(name).into_owned())
                .unwrap_or_default();
            let url = get_dict(doc, dict, b"A")
                .filter(|action| get_name(doc, action, b"S") == Some(&b"URI"[..]))
                .and_then(|action| get_text(doc, action, b"URI"));
            PageAnnotation::new(subtype, url)
        })
        .collect();

    Ok(annotations)
}
