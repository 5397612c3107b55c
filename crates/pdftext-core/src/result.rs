//! Per-page and whole-document extraction results.

use crate::annotation::Annotation;
use crate::metadata::{DocumentInfo, XmpMetadata};

/// Output of processing one page.
///
/// Both fields default to empty, which is also what a failed page yields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    pub text: String,
    pub annotations: Vec<Annotation>,
}

/// Result of one extraction call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractionResult {
    /// Total page count of the document, independent of `max_pages`.
    pub num_pages: usize,
    /// Document info; `None` together with `metadata` if retrieval failed.
    pub info: Option<DocumentInfo>,
    /// XMP metadata; `None` if absent or if retrieval failed.
    pub metadata: Option<XmpMetadata>,
    /// Reconstructed text of each processed page, in page order.
    pub text: Vec<String>,
    /// Annotations of all processed pages in ascending page order.
    ///
    /// `None` when annotations were not requested, as opposed to
    /// `Some(vec![])` when requested and none were found.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub annotations: Option<Vec<Annotation>>,
}

impl ExtractionResult {
    /// All page texts joined with a newline.
    pub fn joined_text(&self) -> String {
        self.text.join("\n")
    }

    /// Number of pages actually processed.
    pub fn processed_pages(&self) -> usize {
        self.text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExtractionResult {
        ExtractionResult {
            num_pages: 3,
            info: None,
            metadata: None,
            text: vec!["one".to_string(), String::new(), "three".to_string()],
            annotations: None,
        }
    }

    #[test]
    fn page_result_default_is_empty() {
        let page = PageResult::default();
        assert!(page.text.is_empty());
        assert!(page.annotations.is_empty());
    }

    #[test]
    fn joined_text_keeps_empty_pages() {
        assert_eq!(sample().joined_text(), "one\n\nthree");
    }

    #[test]
    fn processed_pages_counts_text_entries() {
        let mut result = sample();
        result.text.truncate(2);
        assert_eq!(result.processed_pages(), 2);
        assert_eq!(result.num_pages, 3);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn absent_annotations_are_omitted() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("annotations").is_none());

        let mut with = sample();
        with.annotations = Some(Vec::new());
        let json = serde_json::to_value(with).unwrap();
        assert_eq!(json["annotations"], serde_json::json!([]));
    }
}
