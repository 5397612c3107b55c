//! Shared helpers for reading lopdf objects.

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::BackendError;

/// Follow an indirect reference, returning the object itself otherwise.
pub(crate) fn resolve_object<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Look up `key` in `dict` and resolve a reference in the value.
pub(crate) fn get_resolved<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    dict.get(key).ok().map(|obj| resolve_object(doc, obj))
}

pub(crate) fn get_dict<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Dictionary> {
    get_resolved(doc, dict, key)?.as_dict().ok()
}

pub(crate) fn get_array<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Vec<Object>> {
    get_resolved(doc, dict, key)?.as_array().ok()
}

pub(crate) fn get_name<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a [u8]> {
    get_resolved(doc, dict, key)?.as_name().ok()
}

pub(crate) fn object_to_f64(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some((*f).into()),
        _ => None,
    }
}

/// The document catalog (trailer /Root).
pub(crate) fn catalog(doc: &Document) -> Option<&Dictionary> {
    get_dict(doc, &doc.trailer, b"Root")
}

/// Look up an inheritable page attribute, walking /Parent links.
pub(crate) fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut current = doc
        .get_object(page_id)
        .and_then(|o| o.as_dict())
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

    // Bounded to guard against /Parent cycles.
    for _ in 0..64 {
        if let Ok(value) = current.get(key) {
            return Ok(Some(resolve_object(doc, value)));
        }
        match current.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => {
                current = doc
                    .get_object(*parent_id)
                    .and_then(|o| o.as_dict())
                    .map_err(|e| BackendError::Parse(format!("failed to resolve /Parent: {e}")))?;
            }
            _ => return Ok(None),
        }
    }
    Ok(None)
}

/// Decode a PDF text string.
///
/// UTF-16BE with a byte order mark, UTF-8 (with or without BOM), and
/// otherwise each byte as a Latin-1 code point.
pub(crate) fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Read a text-string or name entry as a Rust string.
pub(crate) fn get_text(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    match get_resolved(doc, dict, key)? {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

/// Decompressed content of a stream, or its raw bytes if unfiltered.
pub(crate) fn stream_content(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.has(b"Filter") {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("failed to decompress stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}
