//! XMP metadata packet parsing.
//!
//! Reads the catalog `/Metadata` stream and flattens the properties of each
//! `rdf:Description` into lower-cased qualified names. Array properties
//! (`rdf:Bag`, `rdf:Seq`, `rdf:Alt`) become lists of their `rdf:li` items;
//! everything else becomes trimmed text.

use lopdf::Document;
use pdftext_core::{XmpMetadata, XmpValue};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::BackendError;
use crate::objects::{catalog, get_resolved, stream_content};

/// Read the document's XMP packet, if it has one.
pub(crate) fn document_xmp(doc: &Document) -> Result<Option<XmpMetadata>, BackendError> {
    let Some(obj) = catalog(doc).and_then(|root| get_resolved(doc, root, b"Metadata")) else {
        return Ok(None);
    };
    let stream = obj
        .as_stream()
        .map_err(|e| BackendError::Xmp(format!("/Metadata is not a stream: {e}")))?;
    let bytes = stream_content(stream)?;
    let text = String::from_utf8_lossy(&bytes);
    parse_xmp(&text).map(Some)
}

/// The property currently being read.
struct OpenProperty {
    key: String,
    text: String,
    items: Option<Vec<String>>,
    item: Option<String>,
}

/// Parse an XMP packet.
pub(crate) fn parse_xmp(packet: &str) -> Result<XmpMetadata, BackendError> {
    let packet = packet.trim_start_matches('\u{feff}');
    let mut metadata = XmpMetadata::new(packet);

    let mut reader = Reader::from_str(packet);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut depth = 0usize;
    // Depth of the enclosing rdf:Description, once inside one.
    let mut description: Option<usize> = None;
    let mut property: Option<OpenProperty> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                depth += 1;
                let name = qualified_name(&e);
                if let Some(open) = property.as_mut() {
                    match name.as_str() {
                        "rdf:Bag" | "rdf:Seq" | "rdf:Alt" => {
                            open.items.get_or_insert_with(Vec::new);
                        }
                        "rdf:li" => open.item = Some(String::new()),
                        _ => {}
                    }
                } else if name == "rdf:Description" {
                    read_attribute_properties(&e, &mut metadata)?;
                    description = Some(depth);
                } else if description.is_some_and(|d| depth == d + 1) {
                    property = Some(OpenProperty {
                        key: name,
                        text: String::new(),
                        items: None,
                        item: None,
                    });
                }
            }
            Event::Empty(e) => {
                if property.is_none() && qualified_name(&e) == "rdf:Description" {
                    read_attribute_properties(&e, &mut metadata)?;
                }
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                push_text(property.as_mut(), &text);
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e);
                push_text(property.as_mut(), &text);
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if let Some(open) = property.as_mut() {
                    if name == "rdf:li" {
                        if let (Some(item), Some(items)) = (open.item.take(), open.items.as_mut()) {
                            items.push(item.trim().to_string());
                        }
                    }
                }
                if let Some(d) = description {
                    if depth == d + 1 {
                        if let Some(open) = property.take() {
                            let value = match open.items {
                                Some(items) => XmpValue::List(items),
                                None => XmpValue::Text(open.text.trim().to_string()),
                            };
                            metadata.insert(&open.key, value);
                        }
                    } else if depth == d {
                        description = None;
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(metadata)
}

fn qualified_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn push_text(property: Option<&mut OpenProperty>, text: &str) {
    let Some(open) = property else {
        return;
    };
    match open.item.as_mut() {
        Some(item) => item.push_str(text),
        None => open.text.push_str(text),
    }
}

/// Simple properties written as attributes of `rdf:Description`.
fn read_attribute_properties(e: &BytesStart<'_>, metadata: &mut XmpMetadata) -> Result<(), BackendError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| BackendError::Xmp(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if key == "xmlns" || key.starts_with("xmlns:") || key.starts_with("rdf:") {
            continue;
        }
        let value = attr.unescape_value()?;
        metadata.insert(&key, XmpValue::Text(value.trim().to_string()));
    }
    Ok(())
}
