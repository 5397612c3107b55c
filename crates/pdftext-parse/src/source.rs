//! Classification of caller-supplied document references.
//!
//! A document is either supplied in memory or named by a locator. Strings
//! and URLs are always locators; byte buffers are always in-memory data.
//! No validation happens here: a malformed locator or a buffer that is not
//! a PDF fails later, when the engine opens it.

use bytes::Bytes;
use reqwest::Url;

/// A document reference as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentInput {
    /// PDF bytes held in memory.
    Bytes(Bytes),
    /// A string locator: an `http(s)://` or `file://` URL, or a filesystem path.
    Locator(String),
    /// A parsed URL locator.
    Url(Url),
}

impl From<Bytes> for DocumentInput {
    fn from(bytes: Bytes) -> Self {
        DocumentInput::Bytes(bytes)
    }
}

impl From<Vec<u8>> for DocumentInput {
    fn from(bytes: Vec<u8>) -> Self {
        DocumentInput::Bytes(Bytes::from(bytes))
    }
}

impl From<&[u8]> for DocumentInput {
    fn from(bytes: &[u8]) -> Self {
        DocumentInput::Bytes(Bytes::copy_from_slice(bytes))
    }
}

impl<const N: usize> From<&[u8; N]> for DocumentInput {
    fn from(bytes: &[u8; N]) -> Self {
        DocumentInput::Bytes(Bytes::copy_from_slice(bytes))
    }
}

impl From<String> for DocumentInput {
    fn from(locator: String) -> Self {
        DocumentInput::Locator(locator)
    }
}

impl From<&str> for DocumentInput {
    fn from(locator: &str) -> Self {
        DocumentInput::Locator(locator.to_string())
    }
}

impl From<Url> for DocumentInput {
    fn from(url: Url) -> Self {
        DocumentInput::Url(url)
    }
}

impl From<&Url> for DocumentInput {
    fn from(url: &Url) -> Self {
        DocumentInput::Url(url.clone())
    }
}

/// Parameters handed to [`DocumentEngine::open`](crate::DocumentEngine::open).
///
/// Exactly one of `url` and `data` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentParams {
    pub url: Option<String>,
    pub data: Option<Bytes>,
}

impl DocumentParams {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            data: None,
        }
    }

    pub fn from_data(data: impl Into<Bytes>) -> Self {
        Self {
            url: None,
            data: Some(data.into()),
        }
    }
}

/// Shape a document reference into engine parameters.
pub fn classify(input: DocumentInput) -> DocumentParams {
    match input {
        DocumentInput::Bytes(bytes) => DocumentParams::from_data(bytes),
        DocumentInput::Locator(locator) => DocumentParams::from_url(locator),
        DocumentInput::Url(url) => DocumentParams::from_url(String::from(url)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_become_data() {
        let params = classify(DocumentInput::from(vec![1u8, 2, 3]));
        assert_eq!(params.data.as_deref(), Some(&[1u8, 2, 3][..]));
        assert!(params.url.is_none());
    }

    #[test]
    fn slice_becomes_data() {
        let params = classify(b"%PDF-1.7".into());
        assert_eq!(params.data, Some(Bytes::from_static(b"%PDF-1.7")));
        assert!(params.url.is_none());
    }

    #[test]
    fn string_becomes_url() {
        let params = classify("https://example.com/doc.pdf".into());
        assert_eq!(params.url.as_deref(), Some("https://example.com/doc.pdf"));
        assert!(params.data.is_none());
    }

    #[test]
    fn path_string_becomes_url() {
        let params = classify(String::from("./fixtures/sample.pdf").into());
        assert_eq!(params.url.as_deref(), Some("./fixtures/sample.pdf"));
    }

    #[test]
    fn url_object_becomes_url() {
        let url = Url::parse("file:///tmp/a.pdf").unwrap();
        let params = classify(url.into());
        assert_eq!(params.url.as_deref(), Some("file:///tmp/a.pdf"));
        assert!(params.data.is_none());
    }

    #[test]
    fn classification_does_not_validate() {
        let params = classify("not a url at all".into());
        assert_eq!(params.url.as_deref(), Some("not a url at all"));

        let params = classify(Vec::<u8>::new().into());
        assert_eq!(params.data, Some(Bytes::new()));
    }
}
