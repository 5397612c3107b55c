//! Document information mapping.
//!
//! Combines document-level facts (format version, language, feature flags)
//! with the entries of the trailer `/Info` dictionary. Entries outside the
//! standard key set are collected under `Custom`.

use std::collections::BTreeMap;

use lopdf::xref::XrefEntry;
use lopdf::{Dictionary, Document, Object, ObjectId};
use pdftext_core::{DocumentInfo, InfoValue};

use crate::objects::{catalog, decode_text_string, get_dict, get_resolved, get_text, resolve_object};

/// Info dictionary keys reported at the top level.
const STANDARD_KEYS: [&str; 9] = [
    "Title",
    "Author",
    "Subject",
    "Keywords",
    "Creator",
    "Producer",
    "CreationDate",
    "ModDate",
    "Trapped",
];

/// `/SigFlags` bit 1: the document contains at least one signature field.
const SIG_FLAGS_SIGNATURES_EXIST: i64 = 1;

/// Nesting limit when converting custom entries.
const MAX_VALUE_DEPTH: usize = 8;

/// Build the info mapping for a document.
///
/// `encrypt_filter` is the `/Encrypt` `/Filter` name recorded at open time,
/// since decryption removes the dictionary from the trailer.
pub(crate) fn document_info(doc: &Document, encrypt_filter: Option<&str>) -> DocumentInfo {
    let mut info = DocumentInfo::new();
    let root = catalog(doc);

    info.insert("PDFFormatVersion", doc.version.as_str());
    let language = root.and_then(|r| get_text(doc, r, b"Lang"));
    info.insert("Language", language.map_or(InfoValue::Null, InfoValue::Text));
    info.insert(
        "EncryptFilterName",
        encrypt_filter.map_or(InfoValue::Null, |filter| InfoValue::Name(filter.to_string())),
    );
    info.insert("IsLinearized", is_linearized(doc));

    let acro_form = root.and_then(|r| get_dict(doc, r, b"AcroForm"));
    info.insert("IsAcroFormPresent", acro_form.is_some_and(has_fields));
    info.insert("IsXFAPresent", acro_form.is_some_and(|form| form.has(b"XFA")));
    info.insert("IsCollectionPresent", root.is_some_and(|r| r.has(b"Collection")));
    info.insert("IsSignaturesPresent", acro_form.is_some_and(|form| has_signatures(doc, form)));

    let Some(info_dict) = get_dict(doc, &doc.trailer, b"Info") else {
        return info;
    };

    for key in STANDARD_KEYS {
        let value = match get_resolved(doc, info_dict, key.as_bytes()) {
            Some(Object::String(bytes, _)) => InfoValue::Text(decode_text_string(bytes)),
            Some(Object::Name(name)) => InfoValue::Name(String::from_utf8_lossy(name).into_owned()),
            Some(Object::Boolean(b)) => InfoValue::Bool(*b),
            _ => continue,
        };
        info.insert(key, value);
    }

    let custom: BTreeMap<String, InfoValue> = info_dict
        .iter()
        .filter_map(|(key, value)| {
            let key = String::from_utf8_lossy(key).into_owned();
            if STANDARD_KEYS.contains(&key.as_str()) {
                return None;
            }
            Some((key, convert_value(doc, value, 0)))
        })
        .collect();
    if !custom.is_empty() {
        info.insert("Custom", InfoValue::Map(custom));
    }

    info
}

/// Whether the first object in the file is a linearization parameter
/// dictionary.
fn is_linearized(doc: &Document) -> bool {
    first_object_id(doc)
        .and_then(|id| doc.get_object(id).ok())
        .and_then(|obj| obj.as_dict().ok())
        .is_some_and(|dict| dict.has(b"Linearized"))
}

/// The object at the lowest file offset. Documents built in memory have
/// no offsets, so the lowest object number stands in.
fn first_object_id(doc: &Document) -> Option<ObjectId> {
    doc.reference_table
        .entries
        .iter()
        .filter_map(|(&number, entry)| match entry {
            XrefEntry::Normal { offset, generation } => Some((*offset, (number, *generation))),
            _ => None,
        })
        .min_by_key(|(offset, _)| *offset)
        .map(|(_, id)| id)
        .or_else(|| doc.objects.keys().next().copied())
}

fn has_fields(form: &Dictionary) -> bool {
    match form.get(b"Fields") {
        Ok(Object::Array(fields)) => !fields.is_empty(),
        Ok(_) => true,
        Err(_) => false,
    }
}

fn has_signatures(doc: &Document, form: &Dictionary) -> bool {
    get_resolved(doc, form, b"SigFlags")
        .and_then(|obj| obj.as_i64().ok())
        .is_some_and(|flags| flags & SIG_FLAGS_SIGNATURES_EXIST != 0)
}

/// Convert an arbitrary PDF object into an info value.
fn convert_value(doc: &Document, obj: &Object, depth: usize) -> InfoValue {
    if depth > MAX_VALUE_DEPTH {
        return InfoValue::Null;
    }
    match resolve_object(doc, obj) {
        Object::Boolean(b) => InfoValue::Bool(*b),
        Object::Integer(i) => InfoValue::Integer(*i),
        Object::Real(f) => InfoValue::Real((*f).into()),
        Object::String(bytes, _) => InfoValue::Text(decode_text_string(bytes)),
        Object::Name(name) => InfoValue::Name(String::from_utf8_lossy(name).into_owned()),
        Object::Array(items) => {
            InfoValue::List(items.iter().map(|item| convert_value(doc, item, depth + 1)).collect())
        }
        Object::Dictionary(dict) => InfoValue::Map(
            dict.iter()
                .map(|(k, v)| (String::from_utf8_lossy(k).into_owned(), convert_value(doc, v, depth + 1)))
                .collect(),
        ),
        _ => InfoValue::Null,
    }
}
