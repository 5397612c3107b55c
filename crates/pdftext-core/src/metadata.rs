//! Document-level info and XMP metadata.
//!
//! [`DocumentInfo`] is a key/value mapping built from the trailer /Info
//! dictionary plus a few derived document facts (format version, language,
//! linearization, form presence). [`XmpMetadata`] holds the parsed catalog
//! /Metadata stream. Both are best-effort: a failure to read either leaves
//! the pair absent as a whole.

use std::collections::BTreeMap;

/// A single value in a [`DocumentInfo`] mapping.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum InfoValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    /// A PDF name object, without the leading slash.
    Name(String),
    List(Vec<InfoValue>),
    Map(BTreeMap<String, InfoValue>),
}

impl InfoValue {
    /// The string payload of a `Text` or `Name` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            InfoValue::Text(s) | InfoValue::Name(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            InfoValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, InfoValue>> {
        match self {
            InfoValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<&str> for InfoValue {
    fn from(s: &str) -> Self {
        InfoValue::Text(s.to_string())
    }
}

impl From<String> for InfoValue {
    fn from(s: String) -> Self {
        InfoValue::Text(s)
    }
}

impl From<bool> for InfoValue {
    fn from(b: bool) -> Self {
        InfoValue::Bool(b)
    }
}

/// Document info mapping keyed by field name.
///
/// Standard /Info entries keep their PDF key (`Title`, `Author`, ...).
/// Non-standard /Info entries are grouped under `Custom`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DocumentInfo {
    entries: BTreeMap<String, InfoValue>,
}

impl DocumentInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<InfoValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&InfoValue> {
        self.entries.get(key)
    }

    /// Convenience accessor for text-valued entries such as `Title`.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(InfoValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &InfoValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A single XMP property value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum XmpValue {
    Text(String),
    /// Items of an `rdf:Bag`, `rdf:Seq` or `rdf:Alt` container.
    List(Vec<String>),
}

/// Parsed XMP metadata packet.
///
/// Property keys are lower-cased qualified names such as `dc:title` or
/// `xmp:createdate`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XmpMetadata {
    raw: String,
    entries: BTreeMap<String, XmpValue>,
}

impl XmpMetadata {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Insert a property. Keys are stored lower-cased.
    pub fn insert(&mut self, key: &str, value: XmpValue) {
        self.entries.insert(key.to_ascii_lowercase(), value);
    }

    pub fn get(&self, key: &str) -> Option<&XmpValue> {
        self.entries.get(&key.to_ascii_lowercase())
    }

    /// Text of a property; for list values, the first item.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            XmpValue::Text(s) => Some(s),
            XmpValue::List(items) => items.first().map(String::as_str),
        }
    }

    /// The raw XML packet.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &XmpValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Info and XMP metadata as returned by a document engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMetadata {
    pub info: DocumentInfo,
    /// `None` when the catalog carries no /Metadata stream.
    pub metadata: Option<XmpMetadata>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_insert_and_get_text() {
        let mut info = DocumentInfo::new();
        info.insert("Title", "Quarterly Report");
        info.insert("IsLinearized", false);
        assert_eq!(info.get_text("Title"), Some("Quarterly Report"));
        assert_eq!(info.get("IsLinearized").and_then(InfoValue::as_bool), Some(false));
        assert_eq!(info.len(), 2);
        assert!(info.get_text("Author").is_none());
    }

    #[test]
    fn name_values_read_as_str() {
        assert_eq!(InfoValue::Name("True".to_string()).as_str(), Some("True"));
        assert_eq!(InfoValue::Integer(3).as_str(), None);
    }

    #[test]
    fn info_iterates_in_key_order() {
        let mut info = DocumentInfo::new();
        info.insert("Title", "t");
        info.insert("Author", "a");
        let keys: Vec<&str> = info.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Author", "Title"]);
    }

    #[test]
    fn xmp_keys_are_case_insensitive() {
        let mut xmp = XmpMetadata::new("<x:xmpmeta/>");
        xmp.insert("dc:Title", XmpValue::List(vec!["Report".to_string()]));
        assert_eq!(xmp.get_text("dc:title"), Some("Report"));
        assert_eq!(xmp.get_text("DC:TITLE"), Some("Report"));
        assert_eq!(xmp.raw(), "<x:xmpmeta/>");
    }

    #[test]
    fn xmp_empty_list_has_no_text() {
        let mut xmp = XmpMetadata::default();
        xmp.insert("dc:creator", XmpValue::List(Vec::new()));
        assert!(xmp.get("dc:creator").is_some());
        assert_eq!(xmp.get_text("dc:creator"), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn info_serializes_as_flat_object() {
        let mut info = DocumentInfo::new();
        info.insert("PDFFormatVersion", "1.7");
        info.insert("IsAcroFormPresent", false);
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(json, r#"{"IsAcroFormPresent":false,"PDFFormatVersion":"1.7"}"#);
    }
}
